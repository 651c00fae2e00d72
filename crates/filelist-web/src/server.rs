//! Synchronous HTTP form server
//!
//! A single-threaded accept loop speaking just enough HTTP/1.1 for the
//! form page: one request per connection, `Connection: close`. Handling
//! requests sequentially also honors the engine's caller contract of one
//! reconciliation at a time per destination folder.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};

use filelist_core::{History, HistoryField, HistoryStore, Manifest, engine};

use crate::error::{Result, WebError};
use crate::render;

/// A parsed request: method, path, and decoded form fields
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub form: HashMap<String, String>,
}

/// A response ready to be written back
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
}

impl Response {
    fn ok(body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body,
        }
    }

    fn error(status: u16, reason: &'static str, message: &str) -> Self {
        Self {
            status,
            reason,
            body: format!(
                "<!DOCTYPE html>\n<html><body><h1>{status} {reason}</h1><p>{}</p></body></html>\n",
                render::escape(message)
            ),
        }
    }
}

/// The form server
pub struct Server {
    history_store: HistoryStore,
}

impl Server {
    pub fn new(history_file: impl Into<PathBuf>) -> Self {
        Self {
            history_store: HistoryStore::new(history_file.into()),
        }
    }

    /// Bind and serve until the process is terminated.
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)?;
        tracing::info!(addr, "listening");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    // One bad connection never takes the server down
                    if let Err(e) = self.handle_connection(stream) {
                        tracing::warn!(error = %e, "connection failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> Result<()> {
        let request = parse_request(&mut BufReader::new(&mut stream));
        let response = match request {
            Ok(request) => {
                tracing::debug!(method = %request.method, path = %request.path, "request");
                self.handle(&request)
            }
            Err(WebError::BadRequest(message)) => {
                Response::error(400, "Bad Request", &message)
            }
            Err(e) => return Err(e),
        };
        write_response(&mut stream, &response)
    }

    /// Dispatch one request to its handler.
    pub fn handle(&self, request: &Request) -> Response {
        match (request.method.as_str(), request.path.as_str()) {
            ("GET", "/") => self.get_form(),
            ("POST", "/copy-files") => self.post_copy_files(&request.form),
            ("POST", "/validate-destination") => self.post_validate_destination(&request.form),
            ("POST", "/generate-file-list") => self.post_generate_file_list(&request.form),
            ("GET" | "POST", _) => Response::error(404, "Not Found", &request.path),
            _ => Response::error(405, "Method Not Allowed", &request.method),
        }
    }

    fn load_history(&self) -> History {
        self.history_store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "history unreadable, starting empty");
            History::default()
        })
    }

    fn record_history(&self, history: &mut History, values: &[(HistoryField, &str)]) {
        let mut changed = false;
        for (field, value) in values {
            changed |= history.record(*field, value);
        }
        if changed
            && let Err(e) = self.history_store.save(history)
        {
            tracing::warn!(error = %e, "failed to save history");
        }
    }

    fn get_form(&self) -> Response {
        Response::ok(render::page(None, &self.load_history()))
    }

    fn post_copy_files(&self, form: &HashMap<String, String>) -> Response {
        let Some((file_list, source, destination)) = (|| {
            Some((
                form.get("file_list")?,
                form.get("source_folder")?,
                form.get("destination_folder")?,
            ))
        })() else {
            return Response::error(400, "Bad Request", "missing form field");
        };

        // Engine errors become the page message, like any other outcome
        let message = match copy_files(file_list, source, destination) {
            Ok(message) => message,
            Err(e) => e.to_string(),
        };

        let mut history = self.load_history();
        self.record_history(
            &mut history,
            &[
                (HistoryField::FileList, file_list),
                (HistoryField::SourceFolder, source),
                (HistoryField::DestinationFolder, destination),
            ],
        );
        Response::ok(render::page(Some(&message), &history))
    }

    fn post_validate_destination(&self, form: &HashMap<String, String>) -> Response {
        let Some((file_list, destination)) =
            form.get("file_list").zip(form.get("destination_folder"))
        else {
            return Response::error(400, "Bad Request", "missing form field");
        };

        let message = match validate_destination(file_list, destination) {
            Ok(message) => message,
            Err(e) => e.to_string(),
        };

        let mut history = self.load_history();
        self.record_history(
            &mut history,
            &[
                (HistoryField::FileList, file_list),
                (HistoryField::DestinationFolder, destination),
            ],
        );
        Response::ok(render::page(Some(&message), &history))
    }

    fn post_generate_file_list(&self, form: &HashMap<String, String>) -> Response {
        let Some(folder_path) = form.get("folder_path") else {
            return Response::error(400, "Bad Request", "missing form field");
        };

        let message = match generate_file_list(folder_path) {
            Ok(message) => message,
            Err(e) => e.to_string(),
        };

        let mut history = self.load_history();
        self.record_history(&mut history, &[(HistoryField::SourceFolder, folder_path)]);
        Response::ok(render::page(Some(&message), &history))
    }
}

fn copy_files(file_list: &str, source: &str, destination: &str) -> filelist_core::Result<String> {
    let manifest = Manifest::load(Path::new(file_list))?;
    let result = engine::copy(&manifest, Path::new(source), Path::new(destination))?;

    let mut message = format!("Copying process completed. {} files copied.", result.copied);
    if !result.missing_in_destination.is_empty() {
        message.push_str(&format!(
            " Missing files in destination: {}",
            join(&result.missing_in_destination)
        ));
    }
    Ok(message)
}

fn validate_destination(file_list: &str, destination: &str) -> filelist_core::Result<String> {
    let manifest = Manifest::load(Path::new(file_list))?;
    let missing = engine::validate_destination(&manifest, Path::new(destination))?;

    Ok(if missing.is_empty() {
        "All files are present in the destination folder.".to_string()
    } else {
        format!("Missing files in destination: {}", join(&missing))
    })
}

fn generate_file_list(folder_path: &str) -> filelist_core::Result<String> {
    let folder = Path::new(folder_path);
    let manifest = Manifest::generate_from_folder(folder)?;
    let out_path = folder.join("file_list.json");
    manifest.write(&out_path)?;
    Ok(format!("File list saved to {}", out_path.display()))
}

fn join(names: &std::collections::BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Parse a request head plus an `application/x-www-form-urlencoded` body.
fn parse_request(reader: &mut impl BufRead) -> Result<Request> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(WebError::BadRequest("empty request line".to_string()));
    };
    let method = method.to_string();
    let path = path.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value
                .trim()
                .parse()
                .map_err(|_| WebError::BadRequest("invalid Content-Length".to_string()))?;
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    let form = url::form_urlencoded::parse(&body)
        .into_owned()
        .collect::<HashMap<_, _>>();

    Ok(Request { method, path, form })
}

fn write_response(stream: &mut TcpStream, response: &Response) -> Result<()> {
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.reason,
        response.body.len()
    )?;
    stream.write_all(response.body.as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn server_in(dir: &TempDir) -> Server {
        Server::new(dir.path().join("history.json"))
    }

    fn form_request(path: &str, pairs: &[(&str, &str)]) -> Request {
        Request {
            method: "POST".to_string(),
            path: path.to_string(),
            form: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn get_root_renders_form() {
        let dir = tempdir().unwrap();
        let response = server_in(&dir).handle(&Request {
            method: "GET".to_string(),
            path: "/".to_string(),
            form: HashMap::new(),
        });

        assert_eq!(response.status, 200);
        assert!(response.body.contains("action=\"/copy-files\""));
    }

    #[test]
    fn unknown_path_is_404() {
        let dir = tempdir().unwrap();
        let response = server_in(&dir).handle(&Request {
            method: "GET".to_string(),
            path: "/nope".to_string(),
            form: HashMap::new(),
        });

        assert_eq!(response.status, 404);
    }

    #[test]
    fn unknown_method_is_405() {
        let dir = tempdir().unwrap();
        let response = server_in(&dir).handle(&Request {
            method: "DELETE".to_string(),
            path: "/".to_string(),
            form: HashMap::new(),
        });

        assert_eq!(response.status, 405);
    }

    #[test]
    fn copy_files_reports_count_and_records_history() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let destination = dir.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        let list = dir.path().join("list.json");
        fs::write(&list, r#"{"files": [{"filename": "a.txt"}]}"#).unwrap();

        let server = server_in(&dir);
        let response = server.handle(&form_request(
            "/copy-files",
            &[
                ("file_list", list.to_str().unwrap()),
                ("source_folder", source.to_str().unwrap()),
                ("destination_folder", destination.to_str().unwrap()),
            ],
        ));

        assert_eq!(response.status, 200);
        assert!(response.body.contains("1 files copied."));
        assert!(destination.join("a.txt").is_file());

        let history = HistoryStore::new(dir.path().join("history.json"))
            .load()
            .unwrap();
        assert_eq!(history.file_list, [list.to_str().unwrap()]);
    }

    #[test]
    fn copy_files_with_missing_manifest_renders_error_message() {
        let dir = tempdir().unwrap();
        let server = server_in(&dir);

        let response = server.handle(&form_request(
            "/copy-files",
            &[
                ("file_list", "/no/such/list.json"),
                ("source_folder", "/src"),
                ("destination_folder", "/dst"),
            ],
        ));

        assert_eq!(response.status, 200);
        assert!(response.body.contains("Not found"));
    }

    #[test]
    fn copy_files_missing_field_is_400() {
        let dir = tempdir().unwrap();
        let response = server_in(&dir).handle(&form_request(
            "/copy-files",
            &[("file_list", "/list.json")],
        ));

        assert_eq!(response.status, 400);
    }

    #[test]
    fn validate_destination_reports_missing() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("dst");
        fs::create_dir_all(&destination).unwrap();
        fs::write(destination.join("a.txt"), "a").unwrap();
        let list = dir.path().join("list.json");
        fs::write(
            &list,
            r#"{"files": [{"filename": "a.txt"}, {"filename": "b.txt"}]}"#,
        )
        .unwrap();

        let response = server_in(&dir).handle(&form_request(
            "/validate-destination",
            &[
                ("file_list", list.to_str().unwrap()),
                ("destination_folder", destination.to_str().unwrap()),
            ],
        ));

        assert!(response.body.contains("Missing files in destination: b.txt"));
    }

    #[test]
    fn generate_file_list_writes_manifest() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("data");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("a.txt"), "a").unwrap();

        let response = server_in(&dir).handle(&form_request(
            "/generate-file-list",
            &[("folder_path", folder.to_str().unwrap())],
        ));

        assert!(response.body.contains("File list saved to"));
        let content = fs::read_to_string(folder.join("file_list.json")).unwrap();
        assert!(content.contains("a.txt"));
    }

    #[test]
    fn parse_request_decodes_form_body() {
        let body = "file_list=%2Flists%2Fa.json";
        let raw = format!(
            "POST /copy-files HTTP/1.1\r\nHost: x\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let request = parse_request(&mut raw.as_bytes()).unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/copy-files");
        assert_eq!(request.form["file_list"], "/lists/a.json");
    }

    #[test]
    fn parse_request_rejects_empty_request_line() {
        let raw = b"\r\n";
        assert!(matches!(
            parse_request(&mut &raw[..]),
            Err(WebError::BadRequest(_))
        ));
    }
}
