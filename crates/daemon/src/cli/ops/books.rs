use clap::Args;
use uuid::Uuid;

use shelf_daemon::http_server::api::books::get::GetRequest;
use shelf_daemon::http_server::api::books::list::ListRequest;
use shelf_daemon::http_server::api::client::ClientError;

#[derive(Args, Debug, Clone)]
pub struct Books {
    /// Show one book and its reviews instead of the whole catalog
    #[arg(long)]
    pub id: Option<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum BooksError {
    #[error("API error: {0}")]
    Api(#[from] ClientError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Books {
    type Error = BooksError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let Some(book_id) = self.id else {
            let books = ctx.client.call(ListRequest).await?;
            if books.is_empty() {
                return Ok("No books in the catalog".to_string());
            }

            let lines: Vec<String> = books
                .iter()
                .map(|book| {
                    format!(
                        "{}  {:.2}  {} by {}",
                        book.id, book.average_rating, book.title, book.author
                    )
                })
                .collect();
            return Ok(lines.join("\n"));
        };

        let detail = ctx.client.call(GetRequest { book_id }).await?;
        let mut lines = vec![
            format!("{} by {}", detail.book.title, detail.book.author),
            format!("  average: {:.2}", detail.book.average_rating),
            format!("  cover:   {}", detail.book.image),
            format!("  {}", detail.book.description),
        ];
        if detail.reviews.is_empty() {
            lines.push("  no reviews yet".to_string());
        }
        for review in &detail.reviews {
            lines.push(format!(
                "  [{}] {}: {}",
                review.rating.get(),
                review.user.username,
                review.review_text
            ));
        }
        Ok(lines.join("\n"))
    }
}
