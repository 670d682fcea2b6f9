//! Google Sheets v4 REST binding for the document store traits. Pure
//! transport plumbing; all real logic lives upstream of this module.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::store::{CredentialProvider, DocumentStore, StoreError};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Last row addressed by the open-ended clear of a sheet's data region; far
/// beyond any sheet this system writes.
const CLEAR_ROW_BOUND: usize = 100_000;

/// The token file is re-read on every `acquire`, so a token refreshed
/// out-of-band is picked up by the scheduler's retry path.
pub struct SheetsConnector {
    http: reqwest::Client,
    token_path: PathBuf,
}

impl SheetsConnector {
    pub fn from_default_location() -> anyhow::Result<Self> {
        let dirs = directories_next::ProjectDirs::from("", "", "ministry-signup-sorter")
            .context("cannot determine the user config directory")?;
        Ok(Self {
            http: reqwest::Client::new(),
            token_path: dirs.config_dir().join("token"),
        })
    }
}

#[async_trait]
impl CredentialProvider for SheetsConnector {
    type Store = SheetsSession;

    async fn acquire(&self) -> Result<SheetsSession, StoreError> {
        let token = tokio::fs::read_to_string(&self.token_path)
            .await
            .map_err(|err| {
                StoreError::Document(format!(
                    "cannot read credential file {}: {err}",
                    self.token_path.display()
                ))
            })?;
        Ok(SheetsSession {
            http: self.http.clone(),
            token: token.trim().to_owned(),
        })
    }
}

pub struct SheetsSession {
    http: reqwest::Client,
    token: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

fn spreadsheet_id(doc_url: &str) -> Result<&str, StoreError> {
    doc_url
        .split_once("/d/")
        .map(|(_, rest)| rest.split(['/', '?', '#']).next().unwrap_or(rest))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Document(format!("not a spreadsheet url: {doc_url}")))
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

// Rate limits, server hiccups, and expired auth recover on retry after
// credential re-acquisition; anything else is an addressing error.
fn classify_status(status: StatusCode, body: String) -> StoreError {
    if status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        StoreError::Transport(format!("{status}: {body}"))
    } else {
        StoreError::Document(format!("{status}: {body}"))
    }
}

/// A1 range covering `rows` starting at `start_row`, column A onward.
fn block_range(title: &str, start_row: usize, rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(1);
    let last_col = (b'A' + (width.clamp(1, 26) - 1) as u8) as char;
    let end_row = start_row + rows.len().saturating_sub(1);
    format!("{}!A{start_row}:{last_col}{end_row}", quote_title(title))
}

fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Open-ended row range from `start_row` to the clear bound, all columns.
fn clear_range(title: &str, start_row: usize) -> String {
    format!("{}!{start_row}:{CLEAR_ROW_BOUND}", quote_title(title))
}

impl SheetsSession {
    fn values_url(&self, id: &str, range: &str, suffix: &str) -> Result<reqwest::Url, StoreError> {
        let mut url = reqwest::Url::parse(&format!("{API_BASE}/"))
            .map_err(|err| StoreError::Document(format!("bad api base: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Document("api base cannot hold paths".to_owned()))?
            .push(id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_status(status, body))
        }
    }

    async fn metadata(&self, doc_url: &str) -> Result<Vec<SheetProperties>, StoreError> {
        let id = spreadsheet_id(doc_url)?;
        let url = format!("{API_BASE}/{id}?fields=sheets.properties(sheetId,title)");
        let meta: SpreadsheetMeta = self
            .send(self.http.get(url))
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    async fn batch_update(&self, doc_url: &str, request: serde_json::Value) -> Result<(), StoreError> {
        let id = spreadsheet_id(doc_url)?;
        let url = format!("{API_BASE}/{id}:batchUpdate");
        self.send(
            self.http
                .post(url)
                .json(&json!({ "requests": [request] })),
        )
        .await?;
        Ok(())
    }

    async fn put_values(
        &self,
        doc_url: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        let id = spreadsheet_id(doc_url)?;
        let mut url = self.values_url(id, range, "")?;
        url.set_query(Some("valueInputOption=RAW"));
        self.send(
            self.http
                .put(url)
                .json(&json!({ "range": range, "values": rows })),
        )
        .await?;
        Ok(())
    }

    async fn sheet_id_for(&self, doc_url: &str, title: &str) -> Result<i64, StoreError> {
        self.metadata(doc_url)
            .await?
            .into_iter()
            .find(|p| p.title == title)
            .map(|p| p.sheet_id)
            .ok_or_else(|| StoreError::Document(format!("no worksheet titled {title:?}")))
    }
}

#[async_trait]
impl DocumentStore for SheetsSession {
    async fn read_rows(&self, doc_url: &str, index: usize) -> Result<Vec<Vec<String>>, StoreError> {
        let title = self
            .metadata(doc_url)
            .await?
            .into_iter()
            .nth(index)
            .map(|p| p.title)
            .ok_or_else(|| StoreError::Document(format!("no worksheet at index {index}")))?;
        let id = spreadsheet_id(doc_url)?;
        let url = self.values_url(id, &quote_title(&title), "")?;
        let range: ValueRange = self
            .send(self.http.get(url))
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(range.values)
    }

    async fn sheet_titles(&self, doc_url: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .metadata(doc_url)
            .await?
            .into_iter()
            .map(|p| p.title)
            .collect())
    }

    async fn create_sheet(
        &self,
        doc_url: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), StoreError> {
        self.batch_update(
            doc_url,
            json!({
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }),
        )
        .await
    }

    async fn write_range(
        &self,
        doc_url: &str,
        title: &str,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.put_values(doc_url, &block_range(title, start_row, rows), rows)
            .await
    }

    async fn replace_data(
        &self,
        doc_url: &str,
        title: &str,
        start_row: usize,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        // Clear the whole region below the header first so a block smaller
        // than last cycle's cannot leave stale trailing rows.
        let id = spreadsheet_id(doc_url)?;
        let url = self.values_url(id, &clear_range(title, start_row), ":clear")?;
        self.send(self.http.post(url).json(&json!({}))).await?;
        self.write_range(doc_url, title, start_row, rows).await
    }

    async fn autofit_columns(
        &self,
        doc_url: &str,
        title: &str,
        first_col: usize,
        last_col: usize,
    ) -> Result<(), StoreError> {
        let sheet_id = self.sheet_id_for(doc_url, title).await?;
        self.batch_update(
            doc_url,
            json!({
                "autoResizeDimensions": {
                    "dimensions": {
                        "sheetId": sheet_id,
                        "dimension": "COLUMNS",
                        "startIndex": first_col,
                        "endIndex": last_col
                    }
                }
            }),
        )
        .await
    }
}
