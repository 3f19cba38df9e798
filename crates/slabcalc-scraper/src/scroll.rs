//! Scroll-to-load exhaustion for listings that append rows as the user
//! scrolls.
//!
//! The loop scrolls to the bottom, waits, and re-measures the content height.
//! Two consecutive equal measurements mean nothing more is loading. An
//! iteration cap bounds pages that keep growing forever.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// A page that can be scrolled and measured.
#[async_trait]
pub trait ScrollSurface: Send {
    /// Current total content height, in whatever unit the page reports.
    async fn content_height(&mut self) -> Result<u64, ScraperError>;

    /// Scrolls to the bottom, triggering any lazy loading.
    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Scroll-and-measure rounds performed.
    pub iterations: usize,
    pub final_height: u64,
    /// `false` when the iteration cap was hit while the page was still growing.
    pub exhausted: bool,
}

/// Scrolls `surface` until its height stops changing or `max_iterations`
/// rounds have run.
///
/// Hitting the cap is not an error: whatever has loaded so far is used.
///
/// # Errors
///
/// Propagates any error from the surface.
pub async fn scroll_to_exhaustion<S>(
    surface: &mut S,
    delay: Duration,
    max_iterations: usize,
) -> Result<ScrollOutcome, ScraperError>
where
    S: ScrollSurface + ?Sized,
{
    let mut last_height = surface.content_height().await?;

    for iteration in 1..=max_iterations {
        surface.scroll_to_bottom().await?;
        tokio::time::sleep(delay).await;

        let height = surface.content_height().await?;
        tracing::debug!(iteration, height, last_height, "scrolled listing");
        if height == last_height {
            return Ok(ScrollOutcome {
                iterations: iteration,
                final_height: height,
                exhausted: true,
            });
        }
        last_height = height;
    }

    tracing::warn!(
        max_iterations,
        height = last_height,
        "listing still growing at scroll limit; continuing with loaded content"
    );
    Ok(ScrollOutcome {
        iterations: max_iterations,
        final_height: last_height,
        exhausted: false,
    })
}
