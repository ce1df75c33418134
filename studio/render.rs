/// Page renderer for the plant-doctor studio.
///
/// The studio uses a single HTML template (`studio/assets/studio.html`) with
/// placeholder tokens like `{{TOKEN}}`. Every token is derived from the
/// session's `UiState`; nothing else feeds the page.

use plant_doctor::ui::{ResultView, UiState};
use plant_doctor::{Diagnosis, Plant};

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Renders the full page for `state`.
pub fn render_page(state: &UiState) -> String {
    let html = TEMPLATE
        .replace("{{AUTO_REFRESH}}", if state.is_loading { r#"<meta http-equiv="refresh" content="1">"# } else { "" })
        .replace("{{PLANT_OPTIONS}}", &plant_options(state.selected_plant))
        .replace("{{FILE_INPUT_GENERATION}}", &state.file_input_generation.to_string())
        .replace("{{PREVIEW_SECTION}}", &preview_section(state))
        .replace("{{PREDICT_DISABLED}}", if state.can_predict() { "" } else { "disabled" })
        .replace("{{PREDICT_LABEL}}", state.predict_label())
        .replace("{{CLEAR_BUTTON}}", &clear_button(state))
        .replace("{{RESULT_SECTION}}", &result_section(state.prediction.as_ref()));

    blank_remaining(html)
}

fn plant_options(selected: Option<Plant>) -> String {
    let mut options = vec![format!(
        "<option value=\"\"{}>Select a plant</option>",
        if selected.is_none() { " selected" } else { "" }
    )];
    options.extend(Plant::ALL.iter().map(|plant| {
        let sel = if Some(*plant) == selected { " selected" } else { "" };
        format!("<option value=\"{p}\"{sel}>{p}</option>", p = plant, sel = sel)
    }));
    options.join("\n      ")
}

fn preview_section(state: &UiState) -> String {
    match (&state.selected_file, state.preview) {
        (Some(file), Some(id)) => format!(
            r#"<div class="image-container"><img src="/preview/{id}" alt="Uploaded" title="{name}" class="uploaded-image"></div>"#,
            id = id,
            name = html_escape(&file.name),
        ),
        _ => String::new(),
    }
}

fn clear_button(state: &UiState) -> String {
    if !state.can_clear() {
        return String::new();
    }
    format!(
        r#"<form method="POST" action="/clear"><button type="submit" class="clear-btn" title="Clear"
       onmouseenter="hoverClear(this, true)" onmouseleave="hoverClear(this, false)">{}</button></form>"#,
        state.clear_label()
    )
}

fn result_section(result: Option<&ResultView>) -> String {
    match result {
        None => String::new(),
        Some(ResultView::Message(msg)) => {
            format!(r#"<p class="result error">Result: {}</p>"#, html_escape(msg))
        }
        Some(ResultView::Scores { line, top_label, diagnosis }) => {
            let top = top_label
                .as_deref()
                .map(|l| format!(r#"<div class="top-class">Top class: {}</div>"#, html_escape(l)))
                .unwrap_or_default();
            let about = diagnosis.as_ref().map(diagnosis_section).unwrap_or_default();
            format!(r#"<p class="result">Result: {}</p>{}{}"#, html_escape(line), top, about)
        }
    }
}

fn diagnosis_section(diagnosis: &Diagnosis) -> String {
    format!(
        r#"<div class="diagnosis">{}</div>
  <details class="disease-info"><summary>Learn More About the Disease</summary><p>{}</p></details>"#,
        html_escape(&diagnosis.summary),
        html_escape(diagnosis.description),
    )
}

/// Minimal HTML escaping for text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_doctor::ui::{update, Event, PreviewId, SelectedFile};
    use plant_doctor::workflow::GUIDANCE_MESSAGE;

    fn with_file() -> UiState {
        let file = SelectedFile::new("leaf <1>.png", vec![0u8]);
        update(UiState::default(), Event::SelectFile { file, preview: PreviewId(7) }).state
    }

    #[test]
    fn test_idle_page_has_disabled_predict_and_no_clear() {
        let html = render_page(&UiState::default());
        assert!(html.contains("disabled>Predict</button>"));
        assert!(!html.contains("clear-btn\""));
        assert!(html.contains("<option value=\"\" selected>Select a plant</option>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_file_selected_shows_preview_and_clear() {
        let html = render_page(&with_file());
        assert!(html.contains("/preview/7"));
        assert!(html.contains("leaf &lt;1&gt;.png"));
        assert!(html.contains(">x</button>"));
    }

    #[test]
    fn test_ready_page_enables_predict() {
        let state = update(with_file(), Event::SelectPlant(Some(Plant::Cotton))).state;
        let html = render_page(&state);
        assert!(html.contains("<option value=\"Cotton\" selected>Cotton</option>"));
        assert!(html.contains("class=\"predict-btn\" >Predict</button>"));
    }

    #[test]
    fn test_loading_page_refreshes() {
        let state = update(with_file(), Event::SelectPlant(Some(Plant::Cotton))).state;
        let state = update(state, Event::Predict).state;
        let html = render_page(&state);
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("disabled>Predicting...</button>"));
    }

    #[test]
    fn test_guidance_result_line() {
        let state = update(UiState::default(), Event::Predict).state;
        let html = render_page(&state);
        assert!(html.contains(&format!("Result: {}", GUIDANCE_MESSAGE)));
    }

    #[test]
    fn test_labelled_result_shows_diagnosis() {
        let diagnosis = Diagnosis {
            summary: "The potato plant is Potato___healthy".into(),
            description: Plant::Potato.disease_description("Potato___healthy"),
        };
        let result = ResultView::Scores {
            line: "0.1,0.2,0.7".into(),
            top_label: Some("Potato___healthy (70.0%)".into()),
            diagnosis: Some(diagnosis),
        };
        let html = result_section(Some(&result));
        assert!(html.contains("Result: 0.1,0.2,0.7"));
        assert!(html.contains("The potato plant is Potato___healthy"));
        assert!(html.contains("Learn More About the Disease"));
        assert!(html.contains("Your potato plant looks healthy!"));

        let bare = ResultView::Scores { line: "0.5".into(), top_label: None, diagnosis: None };
        assert!(!result_section(Some(&bare)).contains("Learn More"));
    }

    #[test]
    fn test_blank_remaining() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".into()), "abc");
    }
}
