//! Stylesheet injected once at bootstrap.

/// Class added to a `data-lesson-id` marker once its lesson is complete.
pub const COMPLETED_CLASS: &str = "completed";

pub const STYLESHEET: &str = r#"
.lesson-started::before { content: "🔄 "; }
.lesson-completed::before,
[data-lesson-id].completed::before { content: "✅ "; }
.hint {
    position: fixed;
    top: 20px;
    right: 20px;
    padding: 12px 20px;
    border-radius: 6px;
    color: white;
    font-weight: 500;
    z-index: 10000;
    animation: slideIn 0.3s ease-out;
}
.hint-info { background-color: #0969da; }
.hint-success { background-color: #1a7f37; }
.hint-warning { background-color: #9a6700; }
.hint-error { background-color: #d1242f; }
@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
.output-success { color: #3fb950; white-space: pre-wrap; }
.output-error { color: #f85149; white-space: pre-wrap; }
.output-warning { color: #d29922; white-space: pre-wrap; }
.output-info { color: #58a6ff; }
"#;
