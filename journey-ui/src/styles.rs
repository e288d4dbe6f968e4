#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-journey-ui]";

/// Default CSS for the dashboard along with easy-to-override design tokens.
///
/// Journey cards and type stat cards read their colour from `--journey-accent`,
/// which the component sets inline from the campaign type scheme.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --journey-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --journey-bg: #f8fafc;
  --journey-card-bg: #ffffff;
  --journey-card-border: rgba(148, 163, 184, 0.28);
  --journey-radius: 14px;
  --journey-text: #1f2933;
  --journey-muted: #64748b;
  --journey-heading: #11181c;
  --journey-selected-ring: rgba(37, 99, 235, 0.35);
  --journey-tone-info: #1d4ed8;
  --journey-tone-info-bg: rgba(59, 130, 246, 0.1);
  --journey-tone-success: #047857;
  --journey-tone-success-bg: rgba(16, 185, 129, 0.12);
  --journey-tone-warning: #b45309;
  --journey-tone-warning-bg: rgba(245, 158, 11, 0.14);
  --journey-accent: #64748b;
}

.journey-root {
  font-family: var(--journey-font-family);
  color: var(--journey-text);
  background: var(--journey-bg);
  min-height: 100%;
  padding: 24px;
  box-sizing: border-box;
}

.journey-header h1 {
  margin: 0;
  font-size: 1.5rem;
  font-weight: 600;
  color: var(--journey-heading);
}

.journey-header p {
  margin: 4px 0 24px;
  color: var(--journey-muted);
}

.stats-row {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}

.stat-card {
  display: flex;
  flex-direction: column;
  gap: 4px;
  padding: 16px;
  border-radius: var(--journey-radius);
  border: 1px solid var(--journey-card-border);
  background: var(--journey-card-bg);
}

.stat-card[data-tone="info"] {
  background: var(--journey-tone-info-bg);
}

.stat-card[data-tone="success"] {
  background: var(--journey-tone-success-bg);
}

.stats-types .stat-card {
  border-top: 3px solid var(--journey-accent);
}

.stat-title {
  font-size: 0.85rem;
  font-weight: 500;
}

.stat-value {
  font-size: 1.6rem;
  font-weight: 700;
}

.stat-description,
.filter-hint,
.patient-meta,
.patient-contact,
.journey-span,
.journey-progress,
.step-time {
  font-size: 0.75rem;
  color: var(--journey-muted);
}

.filter-bar {
  display: grid;
  grid-template-columns: 2fr 2fr 1fr 1fr auto;
  gap: 12px;
  align-items: start;
  margin-bottom: 24px;
}

.filter-search input,
.filter-select select {
  width: 100%;
  padding: 8px 12px;
  border-radius: 10px;
  border: 1px solid var(--journey-card-border);
  font: inherit;
  box-sizing: border-box;
}

.filter-select {
  display: flex;
  flex-direction: column;
  gap: 4px;
  font-size: 0.75rem;
}

.filter-reset,
.back-button,
.journey-tab {
  padding: 8px 14px;
  border-radius: 10px;
  border: 1px solid var(--journey-card-border);
  background: var(--journey-card-bg);
  font: inherit;
  cursor: pointer;
}

.filter-reset:disabled {
  opacity: 0.5;
  cursor: default;
}

.journey-grid {
  display: grid;
  grid-template-columns: 1fr;
  gap: 24px;
}

.has-selection:not(.is-mobile) .journey-grid {
  grid-template-columns: 320px 1fr;
}

.patient-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.patient-card {
  display: flex;
  gap: 12px;
  width: 100%;
  text-align: left;
  padding: 12px 16px;
  border-radius: var(--journey-radius);
  border: 1px solid var(--journey-card-border);
  background: var(--journey-card-bg);
  cursor: pointer;
  transition: box-shadow 0.2s ease;
}

.patient-card:hover {
  box-shadow: 0 0 0 1px var(--journey-selected-ring);
}

.patient-card.is-selected {
  box-shadow: 0 0 0 2px var(--journey-selected-ring);
}

.patient-card-body {
  display: flex;
  flex-direction: column;
  gap: 2px;
  min-width: 0;
}

.patient-name,
.detail-name {
  font-weight: 600;
  color: var(--journey-heading);
}

.patient-card-footer {
  display: flex;
  justify-content: space-between;
  margin-top: 6px;
  font-size: 0.75rem;
  font-weight: 500;
}

.active-pill,
.count-pill,
.context-chip,
.type-badge,
.status-badge,
.step-action {
  display: inline-flex;
  align-items: center;
  padding: 2px 8px;
  border-radius: 999px;
  font-size: 0.75rem;
}

.active-pill,
.status-badge[data-tone="info"] {
  color: var(--journey-tone-info);
  background: var(--journey-tone-info-bg);
}

.status-badge[data-tone="success"] {
  color: var(--journey-tone-success);
  background: var(--journey-tone-success-bg);
}

.status-badge[data-tone="warning"] {
  color: var(--journey-tone-warning);
  background: var(--journey-tone-warning-bg);
}

.avatar {
  flex: none;
  border-radius: 50%;
  object-fit: cover;
}

.avatar-fallback {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  background: var(--journey-tone-info-bg);
  color: var(--journey-tone-info);
  font-weight: 600;
}

.avatar-small {
  width: 40px;
  height: 40px;
}

.avatar-large {
  width: 64px;
  height: 64px;
  font-size: 1.25rem;
}

.detail-header {
  display: flex;
  gap: 16px;
  align-items: center;
  padding: 16px;
  margin-bottom: 24px;
  border-radius: var(--journey-radius);
  border: 1px solid var(--journey-card-border);
  background: var(--journey-card-bg);
}

.detail-name {
  margin: 0;
  font-size: 1.25rem;
}

.detail-contact {
  display: flex;
  flex-wrap: wrap;
  gap: 12px;
  margin-top: 6px;
  font-size: 0.85rem;
  color: var(--journey-muted);
}

.context-chip {
  background: rgba(100, 116, 139, 0.12);
}

.journeys-heading {
  display: flex;
  align-items: center;
  gap: 8px;
  font-size: 1.1rem;
}

.count-pill {
  color: var(--journey-tone-info);
  background: var(--journey-tone-info-bg);
}

.journey-tabs {
  display: flex;
  gap: 8px;
  margin-bottom: 16px;
}

.journey-tab.is-active {
  background: var(--journey-heading);
  color: #ffffff;
}

.journey-list {
  display: flex;
  flex-direction: column;
  gap: 24px;
}

.journey-card {
  padding: 16px;
  border-radius: var(--journey-radius);
  border: 1px solid var(--journey-card-border);
  border-top: 3px solid var(--journey-accent);
  background: var(--journey-card-bg);
}

.journey-card h3 {
  margin: 8px 0 2px;
  font-size: 1.1rem;
  font-weight: 500;
}

.journey-badges {
  display: flex;
  gap: 8px;
}

.type-badge {
  color: var(--journey-accent);
  border: 1px solid var(--journey-accent);
}

.step-list {
  list-style: none;
  margin: 12px 0 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 10px;
}

.step {
  display: flex;
  gap: 12px;
  animation: journey-fade-in 0.3s ease both;
}

.step-body {
  display: flex;
  flex-direction: column;
  gap: 2px;
}

.step-marker {
  flex: none;
  display: inline-flex;
  align-items: center;
  justify-content: center;
  width: 28px;
  height: 28px;
  border-radius: 50%;
  font-size: 0.85rem;
}

.step-marker[data-tone="accent"] {
  color: var(--journey-accent);
  background: color-mix(in srgb, var(--journey-accent) 12%, transparent);
}

.step-marker[data-tone="highlight"] {
  color: var(--journey-accent);
  background: color-mix(in srgb, var(--journey-accent) 22%, transparent);
  box-shadow: 0 0 0 2px color-mix(in srgb, var(--journey-accent) 30%, transparent);
}

.step-marker[data-tone="muted"] {
  color: var(--journey-muted);
  background: rgba(148, 163, 184, 0.18);
}

.step-marker[data-tone="faint"] {
  color: var(--journey-muted);
  background: rgba(148, 163, 184, 0.1);
}

.step-marker.is-pulsing {
  animation: journey-pulse 1.6s ease-in-out infinite;
}

.step-name {
  font-size: 0.9rem;
  font-weight: 500;
}

.step[data-status="active"] .step-name,
.track-step[data-status="active"] .step-name {
  color: var(--journey-accent);
}

.step[data-status="upcoming"] .step-name,
.track-step[data-status="upcoming"] .step-name {
  color: var(--journey-muted);
}

.step-name.is-skipped {
  color: var(--journey-muted);
  text-decoration: line-through;
}

.step-detail {
  margin: 2px 0 0;
  font-size: 0.8rem;
}

.step-metadata {
  display: grid;
  grid-template-columns: auto 1fr;
  gap: 2px 8px;
  margin: 4px 0 0;
  font-size: 0.75rem;
}

.step-metadata dt {
  color: var(--journey-muted);
}

.step-metadata dd {
  margin: 0;
}

.step-actions {
  display: flex;
  flex-wrap: wrap;
  gap: 6px;
  margin-top: 4px;
}

.step-action {
  border: 1px solid var(--journey-accent);
  color: var(--journey-accent);
}

.step-track {
  list-style: none;
  margin: 16px 0 0;
  padding: 0;
  display: flex;
  justify-content: space-between;
  gap: 8px;
  overflow-x: auto;
  position: relative;
}

.step-track::before {
  content: '';
  position: absolute;
  top: 14px;
  left: 0;
  right: 0;
  height: 2px;
  background: rgba(148, 163, 184, 0.2);
}

.track-step {
  position: relative;
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 6px;
  min-width: 84px;
  max-width: 100px;
  text-align: center;
  cursor: help;
}

.track-step .step-name {
  font-size: 0.75rem;
  width: 80px;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

.empty-state,
.empty-selection {
  text-align: center;
  padding: 32px 0;
  color: var(--journey-muted);
}

.empty-selection h3 {
  margin: 0 0 8px;
  color: var(--journey-heading);
}

@keyframes journey-fade-in {
  from { opacity: 0; transform: translateY(4px); }
  to { opacity: 1; transform: none; }
}

@keyframes journey-pulse {
  0%, 100% { opacity: 1; }
  50% { opacity: 0.55; }
}

@media (max-width: 960px) {
  .filter-bar {
    grid-template-columns: 1fr 1fr;
  }

  .filter-reset {
    grid-column: 1 / -1;
  }
}

.journey-root.is-mobile {
  padding: 16px;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-journey-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
