// Scoped under the `ilv-` prefix and rendered by the component that uses them.

pub const VIEWER_STYLES: &str = r#"
.ilv-viewer {
    border: 1px solid #ddd;
    border-radius: 8px;
    background: #fff;
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', monospace;
    margin-bottom: 16px;
}
.ilv-viewer .ilv-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px;
    background: #f5f5f5;
    border-bottom: 1px solid #ddd;
    border-radius: 8px 8px 0 0;
}
.ilv-viewer .ilv-status {
    display: flex;
    align-items: center;
    gap: 8px;
}
.ilv-viewer .ilv-indicator {
    width: 12px;
    height: 12px;
    border-radius: 50%;
    background: #ccc;
}
.ilv-viewer .ilv-indicator.connected {
    background: #4CAF50;
    animation: ilv-pulse 2s infinite;
}
.ilv-viewer .ilv-indicator.disconnected { background: #f44336; }
.ilv-viewer .ilv-indicator.error { background: #ff9800; }
.ilv-viewer .ilv-indicator.completed { background: #2196F3; }
@keyframes ilv-pulse {
    0% { opacity: 1; }
    50% { opacity: 0.5; }
    100% { opacity: 1; }
}
.ilv-viewer .ilv-progress-section {
    padding: 16px;
    background: #fafafa;
    border-bottom: 1px solid #eee;
}
.ilv-viewer .ilv-progress-row {
    display: flex;
    align-items: center;
    gap: 12px;
    margin-bottom: 8px;
}
.ilv-viewer .ilv-progress-bar {
    flex: 1;
    height: 8px;
    background: #e0e0e0;
    border-radius: 4px;
    overflow: hidden;
}
.ilv-viewer .ilv-progress-fill {
    height: 100%;
    background: #2196F3;
    transition: width 0.3s ease;
}
.ilv-viewer .ilv-progress-fill.in-progress { background: #ff9800; }
.ilv-viewer .ilv-progress-fill.completed { background: #4CAF50; }
.ilv-viewer .ilv-step {
    font-size: 14px;
    color: #666;
    font-style: italic;
}
.ilv-viewer .ilv-log {
    height: 400px;
    overflow-y: auto;
    padding: 16px;
    background: #1e1e1e;
    color: #fff;
}
.ilv-viewer .ilv-line {
    margin-bottom: 4px;
    line-height: 1.4;
}
.ilv-viewer .ilv-time {
    color: #888;
    margin-right: 8px;
}
.ilv-viewer .ilv-level {
    margin-right: 8px;
    font-weight: bold;
}
.ilv-viewer .ilv-log-info .ilv-level { color: #2196F3; }
.ilv-viewer .ilv-log-warn .ilv-level { color: #ff9800; }
.ilv-viewer .ilv-log-error .ilv-level { color: #f44336; }
.ilv-viewer .ilv-log-success .ilv-level { color: #4CAF50; }
.ilv-viewer .ilv-controls {
    display: flex;
    gap: 8px;
    padding: 16px;
    background: #f5f5f5;
    border-top: 1px solid #ddd;
    border-radius: 0 0 8px 8px;
}
.ilv-viewer .ilv-controls button {
    padding: 8px 16px;
    border: 1px solid #ddd;
    background: #fff;
    border-radius: 4px;
    cursor: pointer;
    transition: background 0.2s;
}
.ilv-viewer .ilv-controls button:hover { background: #f0f0f0; }
"#;

pub const MANAGER_STYLES: &str = r#"
.ilv-manager {
    font-family: system-ui, sans-serif;
    max-width: 960px;
    margin: 0 auto;
}
.ilv-manager .ilv-form {
    display: flex;
    flex-wrap: wrap;
    gap: 8px;
    align-items: center;
    margin-bottom: 16px;
}
.ilv-manager .ilv-form input {
    padding: 6px 8px;
    border: 1px solid #ccc;
    border-radius: 4px;
}
.ilv-manager .ilv-error {
    color: #f44336;
    margin-bottom: 12px;
}
.ilv-manager .ilv-active {
    list-style: none;
    padding: 0;
    display: flex;
    gap: 8px;
    flex-wrap: wrap;
}
.ilv-manager .ilv-active li {
    background: #f5f5f5;
    border: 1px solid #ddd;
    border-radius: 4px;
    padding: 4px 8px;
}
"#;
