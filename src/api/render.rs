//! Dashboard page rendering

use crate::dashboard::DashboardView;

/// Render the dashboard as a standalone HTML page
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("  <title>Cleanfeed Dashboard</title>\n");
    html.push_str("  <style>\n");
    html.push_str("    body { font-family: system-ui, sans-serif; margin: 2rem; max-width: 64rem; }\n");
    html.push_str("    label { display: block; margin: 0.5rem 0; }\n");
    html.push_str("    input { width: 100%; padding: 0.4rem; }\n");
    html.push_str("    table { border-collapse: collapse; width: 100%; }\n");
    html.push_str("    th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #ddd; }\n");
    html.push_str("    .notice { color: #a15c00; }\n");
    html.push_str("  </style>\n</head>\n<body>\n");
    html.push_str("  <h1>Cleanfeed Dashboard</h1>\n");

    // Forwarding form
    html.push_str("  <section>\n    <h2>RTMP forwarding</h2>\n");
    if !view.config.is_configured() {
        html.push_str("    <p class=\"notice\">Forwarding is off until an RTMP URL is saved.</p>\n");
    }
    html.push_str("    <form method=\"post\" action=\"/save\">\n");
    html.push_str(&format!(
        "      <label>RTMP URL <input type=\"text\" name=\"rtmpUrl\" value=\"{}\" placeholder=\"rtmp://live.example.com/app\"></label>\n",
        html_escape(&view.config.rtmp_url)
    ));
    html.push_str(&format!(
        "      <label>Stream key <input type=\"password\" name=\"streamKey\" value=\"{}\" autocomplete=\"off\"></label>\n",
        html_escape(&view.config.stream_key)
    ));
    html.push_str("      <button type=\"submit\">Save</button>\n");
    html.push_str("    </form>\n  </section>\n");

    // Recordings
    html.push_str(&format!(
        "  <section>\n    <h2>Recordings in {}</h2>\n",
        html_escape(&view.bucket)
    ));
    if view.listing_failed {
        html.push_str("    <p class=\"notice\">Object storage could not be reached; recordings are unavailable.</p>\n");
    }

    if view.entries.is_empty() {
        html.push_str("    <p>No recordings found.</p>\n");
    } else {
        html.push_str("    <table>\n");
        html.push_str("      <tr><th>File</th><th>Size</th><th>Uploaded</th><th></th></tr>\n");
        for entry in &view.entries {
            html.push_str("      <tr>");
            html.push_str(&format!("<td>{}</td>", html_escape(entry.key())));
            html.push_str(&format!("<td>{}</td>", entry.display_size()));
            html.push_str(&format!(
                "<td>{}</td>",
                entry.object.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            html.push_str(&format!(
                "<td><a href=\"{}\">Download</a></td>",
                html_escape(&entry.signed_url)
            ));
            html.push_str("</tr>\n");
        }
        html.push_str("    </table>\n");
    }
    html.push_str("  </section>\n</body>\n</html>\n");

    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
