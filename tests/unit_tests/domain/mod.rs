mod audio_signal_test;
mod failure_kind_test;
mod media_reference_test;
mod pipeline_result_test;
mod storage_path_test;
mod transcript_test;
