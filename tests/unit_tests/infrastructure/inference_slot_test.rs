use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use murmur::application::ports::TranscriptionError;
use murmur::infrastructure::audio::{CancelFlag, InferenceSlot, run_blocking_with_timeout};

#[tokio::test]
async fn given_fast_job_when_running_with_timeout_then_returns_its_result() {
    let result = run_blocking_with_timeout(Duration::from_secs(5), |_cancel: &CancelFlag| {
        Ok::<_, TranscriptionError>(42)
    })
    .await;

    assert_eq!(result.unwrap(), 42);
}

#[tokio::test]
async fn given_slow_job_when_limit_elapses_then_times_out_and_raises_cancel_flag() {
    let observed_cancel = Arc::new(AtomicBool::new(false));
    let observed = Arc::clone(&observed_cancel);

    let result = run_blocking_with_timeout(Duration::from_millis(50), move |cancel: &CancelFlag| {
        for _ in 0..500 {
            if cancel.is_cancelled() {
                observed.store(true, Ordering::SeqCst);
                return cancel.check().map(|_| ());
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(TranscriptionError::Timeout(d)) if d == Duration::from_millis(50)));
    for _ in 0..200 {
        if observed_cancel.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(observed_cancel.load(Ordering::SeqCst));
}

#[tokio::test]
async fn given_panicking_job_when_running_with_timeout_then_reports_inference_failure() {
    let result = run_blocking_with_timeout(Duration::from_secs(5), |_cancel: &CancelFlag| {
        if true {
            panic!("model exploded");
        }
        Ok::<u32, TranscriptionError>(0)
    })
    .await;

    assert!(matches!(result, Err(TranscriptionError::InferenceFailed(_))));
}

#[test]
fn given_raised_flag_when_checking_then_returns_cancelled_error() {
    let flag = CancelFlag::default();
    assert!(flag.check().is_ok());

    flag.cancel();

    assert!(flag.is_cancelled());
    assert!(matches!(flag.check(), Err(TranscriptionError::InferenceFailed(_))));
}

#[test]
fn given_slot_poisoned_by_panic_when_acquiring_then_model_is_still_usable() {
    let slot = Arc::new(InferenceSlot::new(vec![1u32]));

    let poisoner = Arc::clone(&slot);
    let outcome = std::thread::spawn(move || {
        let mut model = poisoner.acquire();
        model.push(2);
        panic!("inference panicked while holding the slot");
    })
    .join();
    assert!(outcome.is_err());

    let mut model = slot.acquire();
    model.push(3);
    drop(model);

    assert_eq!(*slot.acquire(), vec![1, 2, 3]);
}
