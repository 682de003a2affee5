//! Notification rendering
//!
//! Maps templates, a change magnitude, and an elapsed time to the messages a
//! tick should deliver. Rendering is pure: no I/O and no state.

use crate::config::NotificationTemplate;

/// Which branch of the tick produced the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Change,
    Idle,
}

/// Render a single template, or `None` when it has no text for `mode`.
///
/// `minutes` is the interval length for change messages and the elapsed idle
/// time for idle messages.
pub fn render(
    template: &NotificationTemplate,
    mode: Mode,
    magnitude: u64,
    minutes: f64,
) -> Option<String> {
    let body = match mode {
        Mode::Change => {
            let text = template.change_text()?;
            format!("{} {} {:.2} minutes.", magnitude, text, minutes)
        }
        Mode::Idle => {
            let text = template.idle_text()?;
            format!("{} {:.2} minutes", text, minutes)
        }
    };

    Some(join_parts(&[&template.notification_head, &body, &template.notification_tail]))
}

/// Render every template for `mode`, falling back to a single default
/// message when none of them carries text for it
pub fn compose(
    templates: &[NotificationTemplate],
    mode: Mode,
    magnitude: u64,
    minutes: f64,
) -> Vec<String> {
    let messages: Vec<String> = templates
        .iter()
        .filter_map(|template| render(template, mode, magnitude, minutes))
        .collect();

    if messages.is_empty() {
        vec![default_message(mode, magnitude, minutes)]
    } else {
        messages
    }
}

pub fn default_message(mode: Mode, magnitude: u64, minutes: f64) -> String {
    match mode {
        Mode::Change => format!(
            "activity notification: {} changes in {:.2} minutes",
            magnitude, minutes
        ),
        Mode::Idle => format!("idle notification: idle time: {:.2} minutes", minutes),
    }
}

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(
        head: &str,
        tail: &str,
        on_change: Option<&str>,
        on_idle: Option<&str>,
    ) -> NotificationTemplate {
        NotificationTemplate {
            notification_head: head.to_string(),
            notification_tail: tail.to_string(),
            on_change: on_change.map(String::from),
            on_idle: on_idle.map(String::from),
        }
    }

    #[test]
    fn test_render_change() {
        let t = template("Build log:", "Nice work!", Some("lines written in"), None);
        let message = render(&t, Mode::Change, 12, 1.0).unwrap();

        assert_eq!(message, "Build log: 12 lines written in 1.00 minutes. Nice work!");
    }

    #[test]
    fn test_render_idle() {
        let t = template("Build log:", "Still there?", None, Some("no writes for"));
        let message = render(&t, Mode::Idle, 0, 2.5).unwrap();

        assert_eq!(message, "Build log: no writes for 2.50 minutes Still there?");
    }

    #[test]
    fn test_render_skips_missing_text() {
        let change_only = template("a", "b", Some("changes in"), None);
        let idle_only = template("a", "b", None, Some("idle for"));

        assert!(render(&change_only, Mode::Idle, 0, 1.0).is_none());
        assert!(render(&idle_only, Mode::Change, 3, 1.0).is_none());
    }

    #[test]
    fn test_render_omits_empty_head_and_tail() {
        let t = template("", "", Some("edits in"), None);
        assert_eq!(render(&t, Mode::Change, 4, 0.5).unwrap(), "4 edits in 0.50 minutes.");
    }

    #[test]
    fn test_compose_fans_out() {
        let templates = vec![
            template("first", "", Some("changes in"), None),
            template("second", "", None, Some("idle for")),
            template("third", "", Some("edits in"), Some("quiet for")),
        ];

        let change = compose(&templates, Mode::Change, 7, 1.0);
        assert_eq!(change, vec![
            "first 7 changes in 1.00 minutes.".to_string(),
            "third 7 edits in 1.00 minutes.".to_string(),
        ]);

        let idle = compose(&templates, Mode::Idle, 0, 3.0);
        assert_eq!(idle, vec![
            "second idle for 3.00 minutes".to_string(),
            "third quiet for 3.00 minutes".to_string(),
        ]);
    }

    #[test]
    fn test_compose_defaults() {
        let templates = vec![template("head", "tail", None, Some("idle for"))];
        assert_eq!(
            compose(&templates, Mode::Change, 5, 1.0),
            vec!["activity notification: 5 changes in 1.00 minutes".to_string()]
        );

        assert_eq!(
            compose(&[], Mode::Idle, 0, 2.0),
            vec!["idle notification: idle time: 2.00 minutes".to_string()]
        );
    }
}
