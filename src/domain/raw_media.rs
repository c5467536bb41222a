use bytes::Bytes;

/// Undecoded media payload as it came off the wire.
#[derive(Debug, Clone)]
pub struct RawMediaBytes {
    data: Bytes,
    status: u16,
    content_type: Option<String>,
}

impl RawMediaBytes {
    pub fn new(data: impl Into<Bytes>, status: u16, content_type: Option<String>) -> Self {
        Self {
            data: data.into(),
            status,
            content_type,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension hint for container probing, derived from the MIME type.
    pub fn extension_hint(&self) -> Option<&'static str> {
        let mime = self.content_type.as_deref()?;
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence {
            "audio/mpeg" | "audio/mp3" => Some("mp3"),
            "audio/ogg" | "audio/opus" => Some("ogg"),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => Some("m4a"),
            "audio/flac" | "audio/x-flac" => Some("flac"),
            _ => None,
        }
    }
}
