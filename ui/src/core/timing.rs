//! Timer helpers that work on both the browser and native runtimes.

/// Suspends the current task for `ms` milliseconds.
pub async fn sleep_ms(ms: u64) {
    #[cfg(target_arch = "wasm32")]
    {
        let capped = ms.min(u64::from(u32::MAX)) as u32;
        gloo_timers::future::TimeoutFuture::new(capped).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}
