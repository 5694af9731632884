use crate::entities::preview::Preview;

use super::{embed_json, escape, escape_href, page_shell};

const DEFAULT_LOGO: &str = "/images/companion.svg";
const ADAPTIVE_CARDS_SCRIPT: &str =
    r#"<script src="https://unpkg.com/adaptivecards@2.11.2/dist/adaptivecards.min.js"></script>"#;

/// The shareable phone-frame page for a published preview. The preview data
/// is inlined so the page needs no second request to render.
pub fn render_published_preview(preview: &Preview) -> Result<String, serde_json::Error> {
    let logo = preview.logo.as_deref().unwrap_or(DEFAULT_LOGO);
    let time = preview.published_at.format("%H:%M");

    let shortcuts = if preview.selected_apps.is_empty() {
        r#"<p class="no-results">No apps selected.</p>"#.to_string()
    } else {
        preview
            .selected_apps
            .iter()
            .enumerate()
            .map(|(index, app)| {
                format!(
                    r#"<div class="app-service" data-index="{index}">
                            <div class="service-icon"><i class="{icon}"></i></div>
                            <div class="service-info"><h4>{title}</h4></div>
                        </div>"#,
                    icon = escape(app.icon.as_deref().unwrap_or("fas fa-cube")),
                    title = escape(&app.title),
                )
            })
            .collect::<Vec<_>>()
            .join("\n                        ")
    };

    let body = format!(
        r#"    <div class="preview-panel">
        <div id="previewFrame">
            <div class="status-bar">
                <span class="time">{time}</span>
                <div class="status-icons">
                    <i class="fas fa-signal"></i>
                    <i class="fas fa-wifi"></i>
                    <i class="fas fa-battery-full"></i>
                </div>
            </div>
            <div class="preview-header">
                <img id="previewLogo" src="{logo}" alt="App Logo" class="preview-logo">
                <h3 id="previewTitle" class="preview-title">{app_name}</h3>
            </div>
            <div class="preview-content">
                <div class="preview-title"><h2>Shortcuts</h2></div>
                <div id="previewAppsList" class="previewAppsList">
                        {shortcuts}
                </div>
                <div class="mobile-app-modal" id="mobileAppModal" style="display:none">
                    <div class="mobile-modal-content">
                        <div class="mobile-modal-header">
                            <button class="back-button" id="closeMobileModal"><i class="fas fa-arrow-left"></i></button>
                            <h3 id="mobileModalTitle"></h3>
                        </div>
                        <div class="modal-body"><div id="adaptiveCardContainer"></div></div>
                    </div>
                </div>
            </div>
        </div>
    </div>
    <script type="application/json" id="preview-data">{data}</script>
    <script>
        (function () {{
            const preview = JSON.parse(document.getElementById('preview-data').textContent);
            const list = document.getElementById('previewAppsList');
            const modal = document.getElementById('mobileAppModal');
            const title = document.getElementById('mobileModalTitle');
            const container = document.getElementById('adaptiveCardContainer');

            function open(app) {{
                title.textContent = app.title;
                container.textContent = '';
                try {{
                    if (!app.cardJson) throw new Error('No card JSON found for this app');
                    const card = new AdaptiveCards.AdaptiveCard();
                    card.parse(app.cardJson);
                    container.appendChild(card.render());
                }} catch (error) {{
                    container.textContent = 'Error rendering card: ' + error.message;
                }}
                list.style.display = 'none';
                modal.style.display = 'block';
            }}

            list.querySelectorAll('.app-service').forEach(function (el) {{
                el.addEventListener('click', function () {{
                    open(preview.selectedApps[Number(el.dataset.index)]);
                }});
            }});

            document.getElementById('closeMobileModal').addEventListener('click', function () {{
                modal.style.display = 'none';
                list.style.display = 'grid';
            }});
        }})();
    </script>"#,
        logo = escape_href(logo),
        app_name = escape(&preview.app_name),
        data = embed_json(preview)?,
    );

    Ok(page_shell(
        &format!("{} - Published Preview", preview.app_name),
        ADAPTIVE_CARDS_SCRIPT,
        &body,
    ))
}
