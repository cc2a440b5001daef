use crate::catalog;
use crate::date::Retention;
use crate::error::{Error, Result};
use chrono::Local;
use elasticsearch::{
    cat::CatIndicesParts,
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::IndicesDeleteParts,
    Elasticsearch,
};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// Capacity of the channel between the catalog scan and the deleters
const CANDIDATE_BUFFER: usize = 64;

/// Create a Elasticsearch client, every request made through it gives up
/// after `timeout`.
pub fn create_client(
    addr: &str, timeout: Duration,
) -> anyhow::Result<Elasticsearch, elasticsearch::Error> {
    let url = Url::parse(addr)?;

    let conn_pool = SingleNodeConnectionPool::new(url);
    let builder = TransportBuilder::new(conn_pool).timeout(timeout);

    let transport = builder.build()?;
    Ok(Elasticsearch::new(transport))
}

/// Stream the names of the `family` indices that are older than `policy`
/// allows.
///
/// The cutoff is taken once, from the local clock, when this is called.
/// Results are sent as soon as they are found. A failing catalog request
/// produces a single error and closes the stream, a malformed date produces
/// an error for that line only.
pub fn list_expired_indices(
    client: &Elasticsearch, family: &str, policy: Retention,
) -> mpsc::Receiver<Result<String>> {
    let cutoff = policy.cutoff(Local::now());
    let (tx, rx) = mpsc::channel(CANDIDATE_BUFFER);
    let client = client.clone();
    let family = family.to_string();

    tokio::spawn(async move {
        let body = match cat_indices(&client).await {
            Ok(body) => body,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };
        for result in catalog::expired_indices(&body, &family, policy, cutoff)
        {
            if tx.send(result).await.is_err() {
                // receiver is gone, nobody is interested anymore
                break;
            }
        }
    });

    rx
}

/// Fetch the `_cat/indices?v` table.
async fn cat_indices(client: &Elasticsearch) -> Result<String> {
    let response =
        client.cat().indices(CatIndicesParts::None).v(true).send().await?;
    ok_body(response).await
}

/// Delete index from elasticsearch
///
/// Returns the name of the deleted index. Any status but 200 is an error
/// carrying the status code and the response body.
pub async fn delete_index(
    client: &Elasticsearch, index: &str,
) -> Result<String> {
    let response = client
        .indices()
        .delete(IndicesDeleteParts::Index(&[index]))
        .send()
        .await?;
    ok_body(response).await?;
    Ok(index.to_string())
}

async fn ok_body(response: Response) -> Result<String> {
    let status = response.status_code();
    let body = response.text().await?;
    if status != StatusCode::OK {
        return Err(Error::Protocol { status: status.as_u16(), body });
    }
    Ok(body)
}
