//! In-process doubles for the network and storage seams, shared by unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use url::Url;

use crate::fetch::{HttpResponse, Transport, TransportError};
use crate::job::{JobRecord, JobUpdate};
use crate::store::JobStore;

/// Serves `pages[n - 1]` as the `jobs` array of page `n`; pages past the end
/// are empty. A page can be scripted to answer HTTP 500 a number of times first.
#[derive(Default)]
pub struct ScriptedTransport {
    pages: Vec<Vec<Value>>,
    failures: Mutex<HashMap<u32, u32>>,
    calls: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing(self, page: u32, times: u32) -> Self {
        self.failures.lock().unwrap().insert(page, times);
        self
    }

    /// Every URL requested, in order.
    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for_page(&self, page: u32) -> usize {
        self.calls()
            .iter()
            .filter(|u| page_param(u) == Some(page))
            .count()
    }
}

fn page_param(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.clone());
        let page = page_param(url).unwrap_or(1);

        if let Some(left) = self.failures.lock().unwrap().get_mut(&page) {
            if *left > 0 {
                *left -= 1;
                return Ok(HttpResponse {
                    status: 500,
                    body: b"upstream unavailable".to_vec(),
                });
            }
        }

        let jobs = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();
        Ok(HttpResponse {
            status: 200,
            body: serde_json::to_vec(&json!({ "jobs": jobs })).unwrap(),
        })
    }
}

/// Upstream-shaped item with the three required fields set.
pub fn raw_item(title: &str, company: &str, url: &str) -> Value {
    json!({
        "title": title,
        "company_name": company,
        "url": url,
        "job_type": "full_time",
        "publication_date": "2024-03-01T10:00:00",
        "candidate_required_location": "Worldwide",
        "description": "<p>desc</p>"
    })
}

/// Keeps the last upserted record per URL and logs every call.
#[derive(Default)]
pub struct RecordingStore {
    fail_urls: HashSet<String>,
    upserts: Mutex<Vec<String>>,
    rows: Mutex<HashMap<String, JobRecord>>,
    closes: AtomicU32,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts for `url` always fail.
    pub fn failing_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }

    /// URL of every upsert call, in call order (failed attempts included).
    pub fn upserts(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn rows(&self) -> HashMap<String, JobRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn closes(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn upsert(&self, url: &str, create: &JobRecord, _update: &JobUpdate) -> Result<()> {
        self.upserts.lock().unwrap().push(url.to_string());
        if self.fail_urls.contains(url) {
            return Err(anyhow!("database is locked"));
        }
        self.rows
            .lock()
            .unwrap()
            .insert(url.to_string(), create.clone());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: JobStore + ?Sized> JobStore for &S {
    async fn upsert(&self, url: &str, create: &JobRecord, update: &JobUpdate) -> Result<()> {
        (**self).upsert(url, create, update).await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
