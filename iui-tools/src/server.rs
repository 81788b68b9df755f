//! Single-threaded static file server for the WebAssembly demo.
//!
//! Files are served from a fixed directory with conventional static-server
//! semantics (index files, directory listings, trailing-slash redirects).
//! Every response, errors included, carries the headers browsers require
//! before enabling cross-origin isolation, which `SharedArrayBuffer` and
//! threaded WebAssembly depend on.

use std::fs::{self, File};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tiny_http::{Header, Method, Request, Response, ResponseBox};

use crate::error::ServeError;
use crate::mime;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Sent with every response.
pub const ISOLATION_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Cross-Origin-Opener-Policy", "same-origin"),
    ("Cross-Origin-Embedder-Policy", "require-corp"),
];

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Characters left unescaped in listing links.
const LINK_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub dir: PathBuf,
    pub bind: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

pub struct Server {
    http: Arc<tiny_http::Server>,
    root: PathBuf,
    stopping: Arc<AtomicBool>,
}

/// Stops a running [`Server`] from another thread, e.g. a Ctrl+C handler.
/// The request being handled, if any, is completed first.
#[derive(Clone)]
pub struct ShutdownHandle {
    http: Arc<tiny_http::Server>,
    stopping: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.http.unblock();
    }
}

impl Server {
    /// Binds the listener. The directory is expected to have passed
    /// [`crate::AssetManifest::check`] already.
    pub fn bind(config: &ServerConfig) -> Result<Self, ServeError> {
        let addr = format!("{}:{}", config.bind, config.port);
        let http = tiny_http::Server::http(addr.as_str()).map_err(|err| ServeError::Bind {
            addr,
            message: err.to_string(),
        })?;

        Ok(Self {
            http: Arc::new(http),
            root: config.dir.clone(),
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// The URL an operator should open, always on `localhost`.
    pub fn url(&self) -> String {
        match self.local_addr() {
            Some(addr) => format!("http://localhost:{}", addr.port()),
            None => "http://localhost".to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            http: Arc::clone(&self.http),
            stopping: Arc::clone(&self.stopping),
        }
    }

    /// Serves requests one at a time until [`ShutdownHandle::shutdown`] is
    /// called.
    pub fn run(&self) {
        loop {
            match self.http.recv() {
                Ok(request) => self.handle(request),
                Err(_) if self.stopping.load(Ordering::SeqCst) => break,
                Err(err) => warn!("failed to accept connection: {err}"),
            }
        }
    }

    fn handle(&self, request: Request) {
        info!(
            "{} {} HTTP/{}",
            request.method(),
            request.url(),
            request.http_version()
        );

        let response = match request.method() {
            Method::Get | Method::Head => self.route(request.url()),
            method => error_page(501, &format!("Unsupported method ({method})")),
        };

        if let Err(err) = request.respond(with_isolation_headers(response)) {
            warn!("failed to send response: {err}");
        }
    }

    fn route(&self, url: &str) -> ResponseBox {
        let (url_path, suffix) = split_url(url);
        let decoded = percent_decode_str(url_path).decode_utf8_lossy();
        let path = resolve(&self.root, &decoded);

        if path.is_dir() {
            if !url_path.ends_with('/') {
                let location = format!("{url_path}/{suffix}");
                let mut response = Response::empty(301).boxed();
                add_header(&mut response, "Location", &location);
                return response;
            }
            for index in INDEX_FILES {
                let index = path.join(index);
                if index.is_file() {
                    return serve_file(&index);
                }
            }
            return list_directory(&path, &decoded);
        }

        if url_path.ends_with('/') {
            return error_page(404, "File not found");
        }
        serve_file(&path)
    }
}

/// Best-effort browser launch. A failing `open` is logged and reported as
/// `false`; it never stops the server.
pub fn open_in_browser<F>(url: &str, open: F) -> bool
where
    F: FnOnce(&str) -> io::Result<()>,
{
    match open(url) {
        Ok(()) => true,
        Err(err) => {
            warn!("could not open a browser for {url}: {err}");
            false
        }
    }
}

/// Splits a request target into its path and the `?query#fragment` rest.
fn split_url(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    }
}

/// Maps a decoded URL path beneath `root`. Empty, `.` and `..` segments are
/// dropped so the result never leaves `root`.
pub fn resolve(root: &Path, url_path: &str) -> PathBuf {
    url_path
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn serve_file(path: &Path) -> ResponseBox {
    let file = match File::open(path) {
        Ok(file) if path.is_file() => file,
        _ => return error_page(404, "File not found"),
    };
    let mut response = Response::from_file(file).boxed();
    add_header(&mut response, "Content-Type", &mime::content_type(path));
    response
}

fn list_directory(dir: &Path, display_path: &str) -> ResponseBox {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return error_page(404, "No permission to list directory"),
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                name.push('/');
            }
            name
        })
        .collect();
    names.sort_by_key(|name| name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut body = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for name in &names {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(name, LINK_SET),
            escape_html(name)
        ));
    }
    body.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    html(200, body)
}

fn error_page(code: u16, message: &str) -> ResponseBox {
    let body = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Error response</title>\n</head>\n<body>\n<h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n<p>Message: {}.</p>\n</body>\n</html>\n",
        escape_html(message)
    );
    html(code, body)
}

fn html(code: u16, body: String) -> ResponseBox {
    let mut response = Response::from_data(body.into_bytes())
        .with_status_code(code)
        .boxed();
    add_header(&mut response, "Content-Type", "text/html; charset=utf-8");
    response
}

fn with_isolation_headers(mut response: ResponseBox) -> ResponseBox {
    for (name, value) in ISOLATION_HEADERS {
        add_header(&mut response, name, value);
    }
    response
}

fn add_header(response: &mut ResponseBox, name: &str, value: &str) {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.add_header(header),
        Err(()) => warn!("dropping invalid header {name}: {value}"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
