//! Generic chunked processing.

use std::future::Future;

/// Records per insert chunk during CSV import.
pub const IMPORT_CHUNK_SIZE: usize = 250;

/// Feeds `items` to `processor` in fixed-size chunks, strictly one chunk at
/// a time: chunk N+1 does not start until chunk N's future resolves, so at
/// most one chunk is ever in flight. Control yields to the runtime between
/// chunks so very large inputs do not starve other tasks.
///
/// Per-chunk results are flattened into one sequence. The first chunk error
/// aborts the remaining chunks; side effects of earlier chunks are not
/// rolled back.
pub async fn process_in_chunks<T, R, E, F, Fut>(
    items: Vec<T>,
    chunk_size: usize,
    mut processor: F,
) -> Result<Vec<R>, E>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>>,
{
    let chunk_size = chunk_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();

    loop {
        let chunk: Vec<T> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        results.extend(processor(chunk).await?);
        tokio::task::yield_now().await;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test]
    async fn splits_into_expected_chunk_sizes() {
        let items: Vec<u32> = (0..530).collect();
        let sizes = Mutex::new(Vec::new());
        let out = process_in_chunks(items, 250, |chunk| {
            sizes.lock().expect("lock").push(chunk.len());
            async move { Ok::<_, ()>(chunk) }
        })
        .await
        .expect("chunks");
        assert_eq!(out.len(), 530);
        assert_eq!(sizes.into_inner().expect("into inner"), vec![250, 250, 30]);
    }

    #[tokio::test]
    async fn chunks_run_strictly_in_sequence() {
        let items: Vec<u32> = (0..10).collect();
        let events = Mutex::new(Vec::new());
        process_in_chunks(items, 4, |chunk| {
            events.lock().expect("lock").push(format!("start {}", chunk[0]));
            let events = &events;
            async move {
                tokio::task::yield_now().await;
                events.lock().expect("lock").push(format!("end {}", chunk[0]));
                Ok::<_, ()>(Vec::<u32>::new())
            }
        })
        .await
        .expect("chunks");
        assert_eq!(
            events.into_inner().expect("into inner"),
            vec!["start 0", "end 0", "start 4", "end 4", "start 8", "end 8"]
        );
    }

    #[tokio::test]
    async fn error_aborts_remaining_chunks_but_keeps_prior_effects() {
        let items: Vec<u32> = (0..9).collect();
        let processed = Mutex::new(Vec::new());
        let result = process_in_chunks(items, 3, |chunk| {
            let first = chunk[0];
            processed.lock().expect("lock").extend(chunk.clone());
            async move {
                if first >= 3 {
                    Err("boom")
                } else {
                    Ok(chunk)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), "boom");
        // The first chunk committed, the failing one was attempted, the
        // third never started.
        assert_eq!(processed.into_inner().expect("into inner").len(), 6);
    }

    #[tokio::test]
    async fn empty_input_produces_no_calls() {
        let calls = Mutex::new(0);
        let out: Vec<u32> = process_in_chunks(Vec::new(), 50, |chunk: Vec<u32>| {
            *calls.lock().expect("lock") += 1;
            async move { Ok::<_, ()>(chunk) }
        })
        .await
        .expect("chunks");
        assert!(out.is_empty());
        assert_eq!(calls.into_inner().expect("into inner"), 0);
    }
}
