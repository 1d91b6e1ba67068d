//! Progress reporting for site builds.
//!
//! Implement [`BuildProgressCallback`] to observe a build as it runs. All
//! methods have no-op defaults, so an implementation only overrides what it
//! cares about. Post-level callbacks fire from concurrent tasks and must be
//! cheap and thread-safe.

use std::sync::Arc;

/// Observer for build progress events.
///
/// `post_num` is 1-based. Because posts render concurrently, completion
/// events may arrive out of order.
pub trait BuildProgressCallback: Send + Sync {
    /// Called once before any post renders.
    fn on_build_start(&self, total_posts: usize) {
        let _ = total_posts;
    }

    /// Called when a post begins rendering.
    fn on_post_start(&self, post_num: usize, total_posts: usize) {
        let _ = (post_num, total_posts);
    }

    /// Called when a post has been rendered and written.
    fn on_post_complete(&self, post_num: usize, total_posts: usize, html_len: usize) {
        let _ = (post_num, total_posts, html_len);
    }

    /// Called when a post fails. The build continues; the error is also
    /// recorded in the corresponding [`crate::output::PostResult`].
    fn on_post_error(&self, post_num: usize, total_posts: usize, error: String) {
        let _ = (post_num, total_posts, error);
    }

    /// Called once after the index has been written.
    fn on_build_complete(&self, total_posts: usize, success_count: usize) {
        let _ = (total_posts, success_count);
    }
}

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn BuildProgressCallback>;

/// A callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressCallback;

impl BuildProgressCallback for NoopProgressCallback {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BuildProgressCallback for CountingCallback {
        fn on_post_start(&self, _post_num: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_post_complete(&self, _post_num: usize, _total: usize, _html_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_post_error(&self, _post_num: usize, _total: usize, _error: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_noops() {
        let cb = NoopProgressCallback;
        cb.on_build_start(3);
        cb.on_post_start(1, 3);
        cb.on_post_complete(1, 3, 100);
        cb.on_post_error(2, 3, "read failed".to_string());
        cb.on_build_complete(3, 2);
    }

    #[test]
    fn callback_works_through_arc() {
        let cb: ProgressCallback = Arc::new(CountingCallback::default());
        cb.on_post_start(1, 2);
        cb.on_post_start(2, 2);
        cb.on_post_complete(1, 2, 512);
        cb.on_post_error(2, 2, "boom".to_string());
    }

    #[test]
    fn counting_callback_counts() {
        let cb = CountingCallback::default();
        cb.on_post_start(1, 1);
        cb.on_post_complete(1, 1, 10);
        assert_eq!(cb.starts.load(Ordering::SeqCst), 1);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 1);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 0);
    }
}
