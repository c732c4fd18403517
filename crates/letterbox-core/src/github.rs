//! Store backed by the GitHub repository contents API.
//!
//! Files travel base64 encoded. The blob SHA returned on read is the version
//! token; GitHub answers 409 when an update carries a SHA that is no longer
//! current.

use crate::error::{LetterboxError, Result};
use crate::store::{Document, FileRef, RepositoryStore, VersionToken, WriteAction, WriteOutcome};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const API_VERSION: &str = "2022-11-28";

pub struct GitHubStore {
    client: Client,
    api_url: Url,
    owner: String,
    repo: String,
    token: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    path: String,
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Contents {
    Dir(Vec<ContentEntry>),
    File(ContentFile),
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    #[serde(default)]
    commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// GitHubStore
// ---------------------------------------------------------------------------

impl GitHubStore {
    pub fn new(
        api_url: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let api_url =
            Url::parse(api_url).map_err(|_| LetterboxError::InvalidApiUrl(api_url.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(LetterboxError::InvalidApiUrl(api_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("letterbox/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_url,
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    fn contents_url(&self, path: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    fn get_contents(&self, path: &str, branch: &str) -> Result<Option<Contents>> {
        let mut url = self.contents_url(path);
        url.query_pairs_mut().append_pair("ref", branch);
        debug!(%url, "GET contents");

        let resp = self.authorized(self.client.get(url)).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp, path)?;
        Ok(Some(resp.json()?))
    }

    fn put_contents(
        &self,
        path: &str,
        text: &str,
        message: &str,
        branch: &str,
        sha: Option<&str>,
    ) -> Result<WriteOutcome> {
        let url = self.contents_url(path);
        debug!(%url, update = sha.is_some(), "PUT contents");
        let body = PutContents {
            message,
            content: STANDARD.encode(text.as_bytes()),
            branch,
            sha,
        };

        let resp = self.authorized(self.client.put(url)).json(&body).send()?;
        if resp.status() == StatusCode::CONFLICT {
            return Err(LetterboxError::StaleVersion(path.to_string()));
        }
        let resp = check_status(resp, path)?;
        let action = if resp.status() == StatusCode::CREATED {
            WriteAction::Created
        } else {
            WriteAction::Updated
        };
        let put: PutResponse = resp.json()?;

        Ok(WriteOutcome {
            action,
            path: path.to_string(),
            commit: put.commit.map(|c| c.sha),
        })
    }
}

fn check_status(resp: Response, path: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(LetterboxError::NotFound(path.to_string()));
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or(body);
    Err(LetterboxError::Api {
        status: status.as_u16(),
        message,
    })
}

fn decode_content(file: &ContentFile) -> Result<String> {
    // A missing encoding is treated as base64.
    if let Some(encoding) = file.encoding.as_deref() {
        if encoding != "base64" {
            return Err(LetterboxError::UnsupportedEncoding {
                path: file.path.clone(),
                encoding: encoding.to_string(),
            });
        }
    }
    // GitHub wraps the payload at 60 columns.
    let packed: String = file.content.split_whitespace().collect();
    let bytes = STANDARD.decode(packed)?;
    Ok(String::from_utf8(bytes)?)
}

impl RepositoryStore for GitHubStore {
    fn list_files(&self, folder: &str, branch: &str) -> Result<Vec<FileRef>> {
        match self.get_contents(folder, branch)? {
            None => {
                debug!(folder, "folder does not exist");
                Ok(Vec::new())
            }
            Some(Contents::Dir(entries)) => Ok(entries
                .into_iter()
                .filter(|e| e.kind == "file")
                .map(|e| FileRef::new(e.path))
                .collect()),
            Some(Contents::File(_)) => {
                warn!(folder, "expected a folder, found a file");
                Ok(Vec::new())
            }
        }
    }

    fn read(&self, path: &str, branch: &str) -> Result<Document> {
        match self.get_contents(path, branch)? {
            None => Err(LetterboxError::NotFound(path.to_string())),
            Some(Contents::Dir(_)) => Err(LetterboxError::NotAFile(path.to_string())),
            Some(Contents::File(file)) => Ok(Document {
                path: path.to_string(),
                text: decode_content(&file)?,
                version: VersionToken(file.sha),
            }),
        }
    }

    fn create(&self, path: &str, text: &str, message: &str, branch: &str) -> Result<WriteOutcome> {
        self.put_contents(path, text, message, branch, None)
    }

    fn update(
        &self,
        path: &str,
        text: &str,
        message: &str,
        branch: &str,
        version: &VersionToken,
    ) -> Result<WriteOutcome> {
        self.put_contents(path, text, message, branch, Some(version.as_str()))
    }

    fn describe(&self) -> String {
        format!("github {}/{}", self.owner, self.repo)
    }
}
