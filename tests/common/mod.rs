//! A primitive HTTP test double used by the `github_client` and
//! `orchestrator` integration tests, standing in for `api.github.com`.
//!
//! Adapted from the teacher's `tests/common/mod.rs`: a single-threaded
//! `TcpListener`-based server with route handlers keyed by method and path
//! pattern (`{param}` components captured, `{...}` matching the remainder).

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use url::Url;

pub type RequestCallback = Box<dyn Send + Fn(Request) -> Response>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn from_str(s: &str) -> Method {
        match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            _ => panic!("unexpected HTTP method {s}"),
        }
    }
}

#[derive(Default)]
pub struct TestBuilder {
    pub handlers: HashMap<(Method, &'static str), RequestCallback>,
}

#[derive(Clone, Debug)]
pub struct Request {
    pub path: String,
    pub method: Method,
    pub components: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub struct Response {
    pub code: u32,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new() -> Response {
        Response {
            code: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn status(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = Vec::from(body);
        self
    }

    pub fn json(body: serde_json::Value) -> Self {
        Response::new().body(body.to_string().as_bytes())
    }
}

pub struct HttpServer {
    listener: TcpListener,
    handlers: HashMap<(Method, &'static str), RequestCallback>,
    requests: Requests,
}

#[derive(Clone, Default)]
pub struct Requests(Arc<Mutex<Vec<(Method, String)>>>);

impl Requests {
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|(m, p)| *m == method && p == path).count()
    }
}

pub struct HttpServerHandle {
    pub addr: SocketAddr,
    pub requests: Requests,
}

impl Drop for HttpServerHandle {
    fn drop(&mut self) {
        if let Ok(mut stream) = TcpStream::connect(self.addr) {
            let _ = stream.write_all(b"STOP");
            let _ = stream.flush();
        }
    }
}

impl TestBuilder {
    pub fn handler<R: 'static + Send + Fn(Request) -> Response>(
        mut self,
        method: Method,
        path: &'static str,
        responder: R,
    ) -> Self {
        self.handlers.insert((method, path), Box::new(responder));
        self
    }

    pub fn build(self) -> HttpServerHandle {
        let requests = Requests::default();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = HttpServer {
            listener,
            handlers: self.handlers,
            requests: requests.clone(),
        };
        std::thread::spawn(move || server.start());
        HttpServerHandle { addr, requests }
    }
}

impl HttpServer {
    fn start(&self) {
        let mut line = String::new();
        'server: loop {
            let (socket, _) = self.listener.accept().unwrap();
            let mut buf = BufReader::new(socket);
            line.clear();
            if buf.read_line(&mut line).unwrap() == 0 {
                continue;
            }
            let mut parts = line.split_ascii_whitespace();
            let method = parts.next().unwrap().to_ascii_uppercase();
            if method == "STOP" {
                return;
            }
            let path = parts.next().unwrap();
            let url = Url::parse(&format!("http://test{path}")).unwrap();

            let mut content_len = None;
            loop {
                line.clear();
                if buf.read_line(&mut line).unwrap() == 0 {
                    continue 'server;
                }
                if line == "\r\n" {
                    line.clear();
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        content_len = value.trim().parse::<u64>().ok();
                    }
                }
            }
            let mut body = vec![0u8; content_len.unwrap_or(0) as usize];
            buf.read_exact(&mut body).unwrap();

            let method = Method::from_str(&method);
            self.requests.0.lock().unwrap().push((method, url.path().to_string()));
            let response = self.route(method, &url, body);

            let buf = buf.get_mut();
            write!(buf, "HTTP/1.1 {}\r\n", response.code).unwrap();
            write!(buf, "Content-Length: {}\r\n", response.body.len()).unwrap();
            write!(buf, "Connection: close\r\n").unwrap();
            for header in response.headers {
                write!(buf, "{header}\r\n").unwrap();
            }
            write!(buf, "\r\n").unwrap();
            buf.write_all(&response.body).unwrap();
            buf.flush().unwrap();
        }
    }

    fn route(&self, method: Method, url: &Url, body: Vec<u8>) -> Response {
        let query = url.query_pairs().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        let path = url.path().to_string();
        for ((route_method, route_pattern), responder) in &self.handlers {
            if *route_method != method {
                continue;
            }
            if let Some(components) = match_route(route_pattern, &segments) {
                return responder(Request {
                    method,
                    path,
                    query,
                    components,
                    body,
                });
            }
        }
        eprintln!("route {method:?} {url} has no handler registered");
        Response {
            code: 404,
            headers: Vec::new(),
            body: b"not found".to_vec(),
        }
    }
}

fn match_route(route_pattern: &str, segments: &[&str]) -> Option<HashMap<String, String>> {
    let mut segments = segments.iter();
    let mut components = HashMap::new();
    for part in route_pattern.split('/') {
        if part == "{...}" {
            let rest: Vec<_> = segments.map(|s| *s).collect();
            components.insert("...".to_string(), rest.join("/"));
            return Some(components);
        }
        match segments.next() {
            None => return None,
            Some(actual) => {
                if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    components.insert(name.to_string(), actual.to_string());
                } else if *actual != part {
                    return None;
                }
            }
        }
    }
    if segments.next().is_some() {
        return None;
    }
    Some(components)
}
