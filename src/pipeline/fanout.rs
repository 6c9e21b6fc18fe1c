use crate::error::AppError;
use std::thread;

/// Run `fetch` once per key on its own scoped thread.
///
/// Results come back in key order. Each fetch fails on its own: an error or
/// a panic in one never cancels or poisons the others.
pub fn fan_out<K, T, F>(keys: &[K], fetch: F) -> Vec<Result<T, AppError>>
where
    K: Sync,
    T: Send,
    F: Fn(&K) -> Result<T, AppError> + Sync,
{
    let fetch = &fetch;
    thread::scope(|scope| {
        let handles: Vec<_> = keys
            .iter()
            .map(|key| scope.spawn(move || fetch(key)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(AppError::Worker("fetch panicked".to_string())))
            })
            .collect()
    })
}
