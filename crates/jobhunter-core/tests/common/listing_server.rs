//! Minimal HTTP/1.1 server imitating the listings API for integration tests.
//!
//! `GET /api/remote-jobs?limit=N&page=P` answers `{"jobs": pages[P - 1]}` (empty
//! past the last page). A page can be told to answer 500 a number of times first.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct State {
    pages: Vec<Vec<Value>>,
    failures: HashMap<u32, u32>,
    requests: Vec<String>,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct ListingServer {
    state: Arc<Mutex<State>>,
    endpoint: String,
}

impl ListingServer {
    /// Starts a server in a background thread serving `pages`.
    pub fn start(pages: Vec<Vec<Value>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State {
            pages,
            ..State::default()
        }));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        ListingServer {
            state,
            endpoint: format!("http://127.0.0.1:{}/api/remote-jobs", port),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Next `times` requests for `page` answer HTTP 500.
    pub fn fail_page(&self, page: u32, times: u32) {
        self.state.lock().unwrap().failures.insert(page, times);
    }

    /// Request targets (path and query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

fn handle(mut stream: std::net::TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let page = page_param(&target).unwrap_or(1);

    let (status, body) = {
        let mut state = state.lock().unwrap();
        state.requests.push(target);
        match state.failures.get_mut(&page) {
            Some(left) if *left > 0 => {
                *left -= 1;
                ("500 Internal Server Error", b"{\"error\":\"busy\"}".to_vec())
            }
            _ => {
                let jobs = state
                    .pages
                    .get(page as usize - 1)
                    .cloned()
                    .unwrap_or_default();
                ("200 OK", serde_json::to_vec(&json!({ "jobs": jobs })).unwrap())
            }
        }
    };

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

fn page_param(target: &str) -> Option<u32> {
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// Upstream-shaped item with every field filled in.
pub fn item(title: &str, company: &str, url: &str) -> Value {
    json!({
        "id": 1,
        "url": url,
        "title": title,
        "company_name": company,
        "category": "Software Development",
        "job_type": "full_time",
        "publication_date": "2024-03-01T10:00:00",
        "candidate_required_location": "Worldwide",
        "description": "<p>Remote role</p>"
    })
}
