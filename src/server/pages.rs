//! Pages module - generates the HTML documents for the web shell.
//!
//! Every view is a single server-generated document with embedded CSS and
//! JS; there is no asset pipeline. The embedded scripts implement the
//! client-side flow: session gating with redirect, drag-drop/picker upload,
//! a single in-flight relay request, and an editable result.

use crate::relay::ACCEPTED_EXTENSIONS;

// =============================================================================
// Shared Chrome
// =============================================================================

/// Stylesheet shared by all pages.
const SHARED_CSS: &str = r##"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}
body {
    background: #020617;
    color: #f8fafc;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
    min-height: 100vh;
}
main {
    display: flex;
    justify-content: center;
    padding: 48px 16px;
}
.page {
    width: 100%;
    max-width: 760px;
    display: flex;
    flex-direction: column;
    gap: 24px;
}
.topbar {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 14px 24px;
    border-bottom: 1px solid #1e293b;
}
.brand {
    color: #f8fafc;
    font-size: 14px;
    font-weight: 600;
    text-decoration: none;
    letter-spacing: 0.02em;
}
.auth-status {
    display: inline-flex;
    align-items: center;
    gap: 10px;
    font-size: 11px;
    color: #94a3b8;
}
.eyebrow {
    text-transform: uppercase;
    letter-spacing: 0.2em;
    font-size: 11px;
    color: #34d399;
}
h1 {
    font-size: 30px;
    font-weight: 600;
    letter-spacing: -0.02em;
    margin-top: 8px;
}
h2 {
    font-size: 14px;
    font-weight: 600;
}
.hero p.muted {
    max-width: 560px;
    margin-top: 10px;
}
.muted {
    color: #94a3b8;
    font-size: 13px;
    line-height: 1.5;
}
.small {
    font-size: 11px;
}
code {
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    color: #34d399;
    font-size: 12px;
}
.card {
    background: #0f172a;
    border: 1px solid #1e293b;
    border-radius: 12px;
    padding: 24px;
    display: flex;
    flex-direction: column;
    gap: 14px;
    box-shadow: 0 10px 30px rgba(0, 0, 0, 0.35);
}
.card-title {
    font-size: 12px;
    font-weight: 600;
    color: #f1f5f9;
}
.cards {
    display: grid;
    gap: 16px;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
}
.hero-actions {
    margin-top: 18px;
}
.button {
    display: inline-flex;
    align-items: center;
    justify-content: center;
    background: #10b981;
    color: #020617;
    border: none;
    border-radius: 8px;
    padding: 10px 18px;
    font-size: 14px;
    font-weight: 500;
    cursor: pointer;
    text-decoration: none;
    transition: background 0.15s;
}
.button:hover {
    background: #34d399;
}
.button:disabled {
    opacity: 0.6;
    cursor: not-allowed;
}
.link-button {
    background: none;
    border: 1px solid #334155;
    border-radius: 6px;
    color: #e2e8f0;
    padding: 4px 10px;
    font-size: 11px;
    cursor: pointer;
    text-decoration: none;
}
.link-button:hover {
    border-color: #64748b;
}
.link-button:disabled {
    opacity: 0.4;
    cursor: not-allowed;
}
label {
    display: flex;
    flex-direction: column;
    gap: 6px;
    font-size: 12px;
    color: #cbd5e1;
}
input[type="email"],
input[type="password"] {
    background: #020617;
    border: 1px solid #334155;
    border-radius: 6px;
    color: #f8fafc;
    padding: 9px 12px;
    font-size: 14px;
    outline: none;
}
input:focus {
    border-color: #10b981;
}
form {
    display: flex;
    flex-direction: column;
    gap: 16px;
}
.dropzone {
    border: 2px dashed #334155;
    border-radius: 10px;
    padding: 36px 16px;
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 6px;
    cursor: pointer;
    transition: border-color 0.15s;
}
.dropzone.has-file {
    border-color: rgba(16, 185, 129, 0.6);
}
.dropzone p {
    font-size: 13px;
    font-weight: 500;
}
.file-details {
    display: flex;
    align-items: center;
    justify-content: space-between;
    gap: 12px;
    background: #020617;
    border: 1px solid #1e293b;
    border-radius: 8px;
    padding: 8px 12px;
}
.file-name {
    display: block;
    font-size: 12px;
    font-weight: 500;
    max-width: 360px;
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
}
.submit-row {
    display: flex;
    align-items: center;
    gap: 12px;
}
.status-done {
    color: #34d399;
}
.error-box {
    color: #f87171;
    background: rgba(69, 10, 10, 0.4);
    border: 1px solid #7f1d1d;
    border-radius: 8px;
    padding: 8px 12px;
    font-size: 12px;
}
.message-box {
    color: #34d399;
    background: rgba(6, 78, 59, 0.3);
    border: 1px solid #065f46;
    border-radius: 8px;
    padding: 8px 12px;
    font-size: 12px;
}
.result-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
}
textarea {
    width: 100%;
    background: #020617;
    border: 1px solid #334155;
    border-radius: 8px;
    color: #f8fafc;
    padding: 12px;
    font-size: 13px;
    line-height: 1.6;
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    resize: vertical;
    outline: none;
}
.toggle-line a {
    color: #34d399;
}
"##;

/// Session helpers shared by all pages.
///
/// The access token issued by the identity provider lives in localStorage;
/// session-scoped API calls echo it back as a bearer header. The header
/// widget mirrors it: sign-in link (with a redirect back to the current
/// path) when signed out, email plus a sign-out button when signed in.
const SESSION_JS: &str = r##"
const SESSION_TOKEN_KEY = 'relay_session_token';

function sessionToken() {
    return window.localStorage.getItem(SESSION_TOKEN_KEY);
}

function storeSessionToken(token) {
    window.localStorage.setItem(SESSION_TOKEN_KEY, token);
}

function clearSessionToken() {
    window.localStorage.removeItem(SESSION_TOKEN_KEY);
}

async function fetchCurrentUser() {
    const token = sessionToken();
    if (!token) return null;
    try {
        const res = await fetch('/api/auth/user', {
            headers: { 'Authorization': 'Bearer ' + token }
        });
        if (!res.ok) return null;
        const data = await res.json();
        return data && data.ok ? data : null;
    } catch (err) {
        return null;
    }
}

async function handleSignOut() {
    const token = sessionToken();
    if (token) {
        try {
            await fetch('/api/auth/signout', {
                method: 'POST',
                headers: { 'Authorization': 'Bearer ' + token }
            });
        } catch (err) {
            // Sign-out is best effort; the local session is cleared anyway
        }
    }
    clearSessionToken();
    window.location.href = '/auth';
}

async function initAuthStatus() {
    const status = document.getElementById('auth-status');
    if (!status) return;
    const user = await fetchCurrentUser();
    status.textContent = '';
    if (!user) {
        const link = document.createElement('a');
        link.className = 'link-button';
        link.href = '/auth?redirect=' + encodeURIComponent(window.location.pathname);
        link.textContent = 'Sign in';
        status.appendChild(link);
        return;
    }
    const label = document.createElement('span');
    label.textContent = user.email ? 'Signed in as ' + user.email : 'Signed in';
    const button = document.createElement('button');
    button.type = 'button';
    button.className = 'link-button';
    button.textContent = 'Sign out';
    button.addEventListener('click', handleSignOut);
    status.appendChild(label);
    status.appendChild(button);
}
"##;

/// Header markup shared by all pages.
const TOPBAR_HTML: &str = r##"<header class="topbar">
        <a class="brand" href="/">transcript-relay</a>
        <span id="auth-status" class="auth-status">Checking session&hellip;</span>
    </header>"##;

/// Assemble a complete HTML document from shared chrome and page parts.
fn page_shell(title: &str, body: &str, script: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    {topbar}
{body}
    <script>
{session_js}
{script}
    </script>
</body>
</html>"##,
        title = title,
        css = SHARED_CSS,
        topbar = TOPBAR_HTML,
        body = body,
        session_js = SESSION_JS,
        script = script,
    )
}

/// Human-readable list of accepted extensions, e.g. ".vtt, .srt, .txt, .pdf".
fn accepted_extensions_label() -> String {
    ACCEPTED_EXTENSIONS.join(", ")
}

/// `accept` attribute value for the file input, e.g. ".vtt,.srt,.txt,.pdf".
fn accepted_extensions_attr() -> String {
    ACCEPTED_EXTENSIONS.join(",")
}

// =============================================================================
// Landing Page
// =============================================================================

const LANDING_JS: &str = r##"
initAuthStatus();
"##;

/// Generate the landing page.
pub fn landing_page() -> String {
    let extension_codes = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!("<code>{}</code>", ext))
        .collect::<Vec<_>>()
        .join(", ");

    let body = format!(
        r##"    <main>
        <div class="page">
            <section class="hero">
                <p class="eyebrow">Internal tool &middot; Early prototype</p>
                <h1>Turn VTT &amp; PDF files into clean, editable text.</h1>
                <p class="muted">Upload subtitle or PDF files, let the processing worker clean
                and extract the content, then copy or edit the result directly in the
                browser.</p>
                <div class="hero-actions">
                    <a class="button" href="/process">Open the processor</a>
                </div>
            </section>
            <section class="cards">
                <div class="card">
                    <p class="card-title">File types</p>
                    <p class="muted">Accepts {extension_codes}.</p>
                </div>
                <div class="card">
                    <p class="card-title">Architecture</p>
                    <p class="muted">Browser &rarr; relay endpoint &rarr; processing worker
                    &rarr; cleaned text &rarr; back to browser.</p>
                </div>
                <div class="card">
                    <p class="card-title">Next steps</p>
                    <p class="muted">Add per-user job history and billing on top of this
                    shell.</p>
                </div>
            </section>
        </div>
    </main>"##,
        extension_codes = extension_codes,
    );

    page_shell("Transcript Relay", &body, LANDING_JS)
}

// =============================================================================
// Auth Page
// =============================================================================

const AUTH_BODY: &str = r##"    <main>
        <div class="page" style="max-width: 420px;">
            <div class="card">
                <header>
                    <p class="eyebrow">Auth</p>
                    <h1 id="auth-title" style="font-size: 22px;">Sign in</h1>
                    <p class="muted">Use email and password for now.</p>
                </header>
                <form id="auth-form">
                    <label>Email
                        <input type="email" id="email" autocomplete="email">
                    </label>
                    <label>Password
                        <input type="password" id="password" autocomplete="current-password">
                    </label>
                    <button type="submit" id="auth-submit" class="button">Sign in</button>
                </form>
                <div id="auth-message" class="message-box" hidden></div>
                <div id="auth-error" class="error-box" hidden></div>
                <p class="muted toggle-line">
                    <span id="toggle-label">No account yet?</span>
                    <a href="#" id="mode-toggle">Create one</a>
                </p>
            </div>
        </div>
    </main>"##;

/// Sign-in/sign-up form flow. The two modes are toggled locally; each mode
/// calls the matching passthrough route and reports provider error text
/// verbatim. A successful sign-in stores the token and follows the
/// `redirect` query parameter back to where the user came from.
const AUTH_JS: &str = r##"
let mode = 'signin';

const authTitle = document.getElementById('auth-title');
const authForm = document.getElementById('auth-form');
const emailInput = document.getElementById('email');
const passwordInput = document.getElementById('password');
const submitButton = document.getElementById('auth-submit');
const messageBox = document.getElementById('auth-message');
const errorBox = document.getElementById('auth-error');
const toggleLabel = document.getElementById('toggle-label');
const modeToggle = document.getElementById('mode-toggle');

function renderMode() {
    const signin = mode === 'signin';
    authTitle.textContent = signin ? 'Sign in' : 'Create an account';
    submitButton.textContent = signin ? 'Sign in' : 'Sign up';
    toggleLabel.textContent = signin ? 'No account yet?' : 'Already have an account?';
    modeToggle.textContent = signin ? 'Create one' : 'Sign in instead';
    passwordInput.setAttribute('autocomplete', signin ? 'current-password' : 'new-password');
}

function showMessage(text) {
    messageBox.hidden = !text;
    messageBox.textContent = text || '';
}

function showError(text) {
    errorBox.hidden = !text;
    errorBox.textContent = text ? 'Error: ' + text : '';
}

modeToggle.addEventListener('click', function (e) {
    e.preventDefault();
    mode = mode === 'signin' ? 'signup' : 'signin';
    showMessage(null);
    showError(null);
    renderMode();
});

authForm.addEventListener('submit', async function (e) {
    e.preventDefault();
    showMessage(null);
    showError(null);

    const email = emailInput.value.trim();
    const password = passwordInput.value;
    if (!email || !password) {
        showError('Please enter email and password.');
        return;
    }

    submitButton.disabled = true;
    submitButton.textContent = mode === 'signin' ? 'Signing in…' : 'Creating account…';
    try {
        const res = await fetch(mode === 'signin' ? '/api/auth/signin' : '/api/auth/signup', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ email: email, password: password })
        });
        const data = await res.json().catch(function () { return null; });
        if (!res.ok || !data || !data.ok) {
            showError((data && (data.message || data.error)) || 'Request failed');
            return;
        }
        if (mode === 'signup') {
            showMessage(data.message);
        } else {
            storeSessionToken(data.access_token);
            const params = new URLSearchParams(window.location.search);
            window.location.href = params.get('redirect') || '/process';
        }
    } catch (err) {
        showError('Unexpected error, please try again.');
    } finally {
        submitButton.disabled = false;
        renderMode();
    }
});

renderMode();
initAuthStatus();
"##;

/// Generate the auth page.
pub fn auth_page() -> String {
    page_shell("Sign in - Transcript Relay", AUTH_BODY, AUTH_JS)
}

// =============================================================================
// Processing Page
// =============================================================================

/// Client-side processing flow:
///
/// ```text
/// checking-session -> unauthenticated (redirect)
///                  | authenticated-idle -> file-selected -> submitting
///                                       -> { result-ready | error }
/// ```
///
/// Picker and drag-drop converge on the same selection handler, which clears
/// any prior result or error. The submit control stays disabled while a
/// request is in flight, so at most one relay call is outstanding. The
/// session check never touches the DOM after navigation away (`cancelled`
/// flag set on pagehide).
const PROCESS_JS: &str = r##"
let cancelled = false;
window.addEventListener('pagehide', function () { cancelled = true; });

const sessionGate = document.getElementById('session-gate');
const app = document.getElementById('app');
const uploadForm = document.getElementById('upload-form');
const dropzone = document.getElementById('dropzone');
const dropzoneTitle = document.getElementById('dropzone-title');
const fileInput = document.getElementById('file-input');
const fileDetails = document.getElementById('file-details');
const fileName = document.getElementById('file-name');
const fileInfo = document.getElementById('file-info');
const clearButton = document.getElementById('clear-file');
const submitButton = document.getElementById('submit-button');
const submitStatus = document.getElementById('submit-status');
const doneStatus = document.getElementById('done-status');
const errorBox = document.getElementById('process-error');
const resultText = document.getElementById('result-text');
const copyButton = document.getElementById('copy-button');

let selectedFile = null;
let submitting = false;

async function checkSession() {
    const user = await fetchCurrentUser();
    if (cancelled) return;
    if (!user) {
        window.location.href = '/auth?redirect=' + encodeURIComponent(window.location.pathname);
        return;
    }
    sessionGate.hidden = true;
    app.hidden = false;
}

function formatFileSize(bytes) {
    if (bytes < 1024) return bytes + ' B';
    if (bytes < 1024 * 1024) return (bytes / 1024).toFixed(1) + ' KB';
    return (bytes / (1024 * 1024)).toFixed(1) + ' MB';
}

function showError(message) {
    errorBox.hidden = !message;
    errorBox.textContent = message ? 'Error: ' + message : '';
}

function showResult(text, meta) {
    resultText.value = text;
    copyButton.disabled = !text;
    if (meta) {
        doneStatus.textContent = 'Done · ' + (meta.type ? String(meta.type).toUpperCase() : 'UNKNOWN');
        doneStatus.hidden = false;
    } else {
        doneStatus.hidden = true;
    }
}

function render() {
    const hasFile = selectedFile !== null;
    dropzoneTitle.textContent = hasFile ? 'File ready to process' : 'Drag & drop a file here';
    dropzone.classList.toggle('has-file', hasFile);
    fileDetails.hidden = !hasFile;
    if (hasFile) {
        fileName.textContent = selectedFile.name;
        fileInfo.textContent = (selectedFile.type || 'Unknown type') + ' · ' + formatFileSize(selectedFile.size);
    }
    submitButton.disabled = submitting || !hasFile;
    submitButton.textContent = submitting ? 'Processing…' : 'Process file';
    submitStatus.hidden = !submitting;
}

function selectFile(file) {
    selectedFile = file || null;
    showError(null);
    showResult('', null);
    render();
}

dropzone.addEventListener('click', function () { fileInput.click(); });
dropzone.addEventListener('dragover', function (e) {
    e.preventDefault();
    e.stopPropagation();
});
dropzone.addEventListener('drop', function (e) {
    e.preventDefault();
    e.stopPropagation();
    const dropped = e.dataTransfer.files && e.dataTransfer.files[0];
    if (dropped) selectFile(dropped);
});
fileInput.addEventListener('change', function () {
    selectFile(fileInput.files && fileInput.files[0]);
});
clearButton.addEventListener('click', function () {
    fileInput.value = '';
    selectFile(null);
});

uploadForm.addEventListener('submit', async function (e) {
    e.preventDefault();
    if (submitting) return;
    showError(null);
    showResult('', null);
    if (!selectedFile) {
        showError('Please select a file first.');
        return;
    }

    submitting = true;
    render();
    try {
        const formData = new FormData();
        formData.append('file', selectedFile);
        const res = await fetch('/api/process', { method: 'POST', body: formData });
        const data = await res.json().catch(function () { return null; });
        if (!res.ok || !data || !data.ok) {
            showError((data && data.error) || 'Processing failed');
            return;
        }
        showResult(data.text || '', data.meta || null);
    } catch (err) {
        showError('Unexpected error. Please try again.');
    } finally {
        submitting = false;
        render();
    }
});

copyButton.addEventListener('click', async function () {
    try {
        await navigator.clipboard.writeText(resultText.value);
    } catch (err) {
        // Clipboard access denied; nothing to do
    }
});

render();
checkSession();
initAuthStatus();
"##;

/// Generate the processing page.
pub fn process_page() -> String {
    let body = format!(
        r##"    <main>
        <div class="page">
            <p id="session-gate" class="muted">Checking your session&hellip;</p>
            <div id="app" hidden>
                <div class="page">
                    <section class="hero">
                        <h1>Clean transcripts from VTT &amp; PDF</h1>
                        <p class="muted">Upload a {label} file. The file is sent to the
                        private processing worker, cleaned up, and the extracted text
                        appears below. Only signed-in users can access this page.</p>
                    </section>
                    <section class="card">
                        <form id="upload-form">
                            <div id="dropzone" class="dropzone">
                                <p id="dropzone-title">Drag &amp; drop a file here</p>
                                <p class="muted small">or click to browse &ndash; accepted: {label}</p>
                                <input type="file" id="file-input" accept="{accept}" hidden>
                            </div>
                            <div id="file-details" class="file-details" hidden>
                                <div>
                                    <span id="file-name" class="file-name"></span>
                                    <span id="file-info" class="muted small"></span>
                                </div>
                                <button type="button" id="clear-file" class="link-button">Clear</button>
                            </div>
                            <div class="submit-row">
                                <button type="submit" id="submit-button" class="button" disabled>Process file</button>
                                <span id="submit-status" class="muted small" hidden>Sending file to worker and waiting for response&hellip;</span>
                                <span id="done-status" class="status-done small" hidden></span>
                            </div>
                            <div id="process-error" class="error-box" hidden></div>
                        </form>
                    </section>
                    <section class="card">
                        <div class="result-header">
                            <h2>Result</h2>
                            <button type="button" id="copy-button" class="link-button" disabled>Copy</button>
                        </div>
                        <textarea id="result-text" rows="14" placeholder="Extracted text will appear here."></textarea>
                    </section>
                </div>
            </div>
        </div>
    </main>"##,
        label = accepted_extensions_label(),
        accept = accepted_extensions_attr(),
    );

    page_shell("Processor - Transcript Relay", &body, PROCESS_JS)
}

// =============================================================================
// Tests
// =============================================================================
