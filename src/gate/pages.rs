//! Full-screen pages rendered by the admin shell in place of the SPA

const HEAD: &str = r#"<meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <script src="https://cdn.tailwindcss.com"></script>"#;

/// Themed page shown on every path while the admin panel is deactivated
pub fn shutdown_page(maintenance_message: &str) -> String {
    if maintenance_message.trim().is_empty() {
        return suspended_page();
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    {head}
    <title>Habesha Expat Admin - System Shutdown</title>
</head>
<body class="min-h-screen bg-gray-950 flex items-center justify-center px-4">
    <div class="max-w-lg w-full text-center space-y-6">
        <div class="mx-auto h-16 w-16 rounded-full bg-amber-500/10 flex items-center justify-center">
            <span class="text-3xl text-amber-400">&#9888;</span>
        </div>
        <h1 class="text-3xl font-extrabold tracking-widest text-amber-400">SYSTEM SHUTDOWN</h1>
        <p class="text-gray-400">The Habesha Expat admin panel has been taken offline by an administrator.</p>
        <div class="rounded-md border border-amber-500/30 bg-gray-900 p-4">
            <p class="text-sm uppercase tracking-wide text-gray-500 mb-2">Maintenance notice</p>
            <p class="text-gray-100 whitespace-pre-line" data-maintenance-message>{message}</p>
        </div>
    </div>
</body>
</html>"#,
        head = HEAD,
        message = html_escape(maintenance_message),
    )
}

/// Shutdown theme without a maintenance notice
pub fn suspended_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    {head}
    <title>Habesha Expat Admin - Suspended</title>
</head>
<body class="min-h-screen bg-gray-950 flex items-center justify-center px-4">
    <div class="max-w-lg w-full text-center space-y-6">
        <h1 class="text-3xl font-extrabold tracking-widest text-amber-400">SERVICE SUSPENDED</h1>
        <p class="text-gray-400">The admin panel is temporarily unavailable. Please check back later.</p>
    </div>
</body>
</html>"#,
        head = HEAD,
    )
}

/// Error card shown when the status check failed; recovery is a manual reload
pub fn error_page(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    {head}
    <title>Habesha Expat Admin - System Error</title>
</head>
<body class="min-h-screen bg-gray-900 flex items-center justify-center px-4">
    <div class="max-w-md w-full rounded-lg bg-gray-800 p-8 space-y-6 text-center">
        <h1 class="text-2xl font-bold text-red-400">SYSTEM ERROR</h1>
        <p class="text-gray-300">Unable to verify the admin panel status.</p>
        <div class="rounded-md bg-red-900 p-4">
            <div class="text-sm text-red-200">{error}</div>
        </div>
        <button type="button" onclick="window.location.reload()"
            class="w-full rounded-md bg-indigo-600 px-4 py-2 text-sm font-medium text-white hover:bg-indigo-700">
            Retry
        </button>
    </div>
</body>
</html>"#,
        head = HEAD,
        error = html_escape(error),
    )
}

/// Spinner shown while the status check has not resolved
pub fn loading_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    {head}
    <title>Habesha Expat Admin</title>
</head>
<body class="min-h-screen bg-gray-900 flex items-center justify-center">
    <div class="flex flex-col items-center space-y-4" role="status" aria-live="polite">
        <div class="h-12 w-12 animate-spin rounded-full border-4 border-gray-700 border-t-indigo-500"></div>
        <p class="text-sm text-gray-400">Checking system status&hellip;</p>
    </div>
</body>
</html>"#,
        head = HEAD,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_page_shows_message() {
        let html = shutdown_page("Back at 0400");
        assert!(html.contains("SYSTEM SHUTDOWN"));
        assert!(html.contains("Back at 0400"));
    }

    #[test]
    fn test_shutdown_page_escapes_message() {
        let html = shutdown_page("<script>alert('x')</script> & more");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn test_blank_message_renders_suspended_page() {
        let html = shutdown_page("   ");
        assert!(html.contains("SERVICE SUSPENDED"));
        assert!(!html.contains("SYSTEM SHUTDOWN"));
    }

    #[test]
    fn test_error_page_has_retry() {
        let html = error_page("Status check request failed");
        assert!(html.contains("SYSTEM ERROR"));
        assert!(html.contains("window.location.reload()"));
        assert!(html.contains("Status check request failed"));
    }

    #[test]
    fn test_loading_page_has_spinner() {
        assert!(loading_page().contains("animate-spin"));
    }
}
