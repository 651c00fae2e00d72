//! HTML rendering for the form page
//!
//! One page: three inputs backed by history datalists, the action
//! buttons, and an optional result message. No templating engine; the
//! page is small enough to assemble directly.

use filelist_core::History;

/// Escape text for interpolation into HTML body or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn datalist(id: &str, values: &[String]) -> String {
    let options: String = values
        .iter()
        .map(|v| format!("      <option value=\"{}\"></option>\n", escape(v)))
        .collect();
    format!("    <datalist id=\"{id}\">\n{options}    </datalist>\n")
}

/// Render the form page, optionally with a result message on top.
pub fn page(message: Option<&str>, history: &History) -> String {
    let message_block = match message {
        Some(text) => format!("    <p class=\"message\">{}</p>\n", escape(text)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>File List Manager</title>
  </head>
  <body>
    <h1>File List Manager</h1>
{message_block}    <form method="post" action="/copy-files">
      <label>File list:
        <input type="text" name="file_list" list="file-list-history">
      </label>
      <label>Source folder:
        <input type="text" name="source_folder" list="source-folder-history">
      </label>
      <label>Destination folder:
        <input type="text" name="destination_folder" list="destination-folder-history">
      </label>
      <button type="submit">Copy Files</button>
      <button type="submit" formaction="/validate-destination">Validate Destination</button>
    </form>
    <form method="post" action="/generate-file-list">
      <label>Folder:
        <input type="text" name="folder_path" list="source-folder-history">
      </label>
      <button type="submit">Generate File List</button>
    </form>
{file_list_history}{source_history}{destination_history}  </body>
</html>
"#,
        file_list_history = datalist("file-list-history", &history.file_list),
        source_history = datalist("source-folder-history", &history.source_folder),
        destination_history = datalist("destination-folder-history", &history.destination_folder),
    )
}
