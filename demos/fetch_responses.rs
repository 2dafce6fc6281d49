use std::io;

use smsgate::{AppKey, FetchResponses, ResponsesPage, SmsGateClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app_key = std::env::var("SMSGATE_APP_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSGATE_APP_KEY environment variable is required",
        )
    })?;
    let page = std::env::var("SMSGATE_PAGE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1);

    let client = SmsGateClient::new(AppKey::new(app_key)?)?;
    let result = client.fetch_responses(FetchResponses::page(page)?).await?;

    match result.data().and_then(ResponsesPage::from_data) {
        Some(page) => {
            println!(
                "page {:?} of {:?} ({} responses)",
                page.page,
                page.total_pages,
                page.items.len()
            );
            for item in &page.items {
                println!(
                    "  {:?} from {:?}: {:?}",
                    item.id.as_ref().map(|id| id.as_str()),
                    item.from,
                    item.text
                );
            }
        }
        None => println!("no inbound responses"),
    }

    Ok(())
}
