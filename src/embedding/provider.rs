use async_trait::async_trait;

use super::error::EmbeddingError;

#[async_trait]
/// External capability that turns text into a fixed-dimension vector.
///
/// Implementations enforce their own timeouts and report cancellation as an error.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, preserving order. The default calls [`embed`](Self::embed)
    /// sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Output dimension.
    fn dimension(&self) -> usize;

    /// Short provider name for logs and health output.
    fn name(&self) -> &str;

    /// `true` for offline stand-ins that do not call a model.
    fn is_stub(&self) -> bool {
        false
    }
}
