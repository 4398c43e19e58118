// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people uploading photos.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives whether a caller may retry or must ask for new input.

use crate::error::RecomposeError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A backend blip; retrying the same input may work.
    Transient,
    /// The user must supply a different photo or mask.
    ActionRequired,
    /// Retrying will not help: bad parameters or an unfit shape.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the system should auto-retry.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `RecomposeError` into a `HumanError`.
pub fn humanize_error(err: &RecomposeError) -> HumanError {
    match err {
        // -- Geometry errors --
        RecomposeError::NoObjectFound | RecomposeError::EmptyMask => HumanError {
            message: "We couldn't find the object in this photo.".into(),
            suggestion: "Try a photo where the object stands out clearly from the background.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RecomposeError::NoFitFound { .. } | RecomposeError::HullTooSmall { .. } => HumanError {
            message: "We couldn't straighten this object.".into(),
            suggestion: "Turn off perspective correction, or use a photo of a flat, four-cornered object.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Face errors --
        // The message is the error text itself so it reaches the user unchanged.
        RecomposeError::NoFaceFound => HumanError {
            message: err.to_string(),
            suggestion: "Use a photo with a clearly visible, front-facing face.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RecomposeError::Detector(detail) => HumanError {
            message: "Face detection is unavailable right now.".into(),
            suggestion: format!("Please try again in a moment. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Input errors --
        RecomposeError::InvalidSpec(detail) => HumanError {
            message: "Some of the settings are out of range.".into(),
            suggestion: format!("Adjust the settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        RecomposeError::DimensionMismatch { .. } => HumanError {
            message: "The mask doesn't match the photo.".into(),
            suggestion: "The mask must be exactly the same size as the photo.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RecomposeError::Image(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        RecomposeError::Io(_) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: "Check that the file exists and that there is free disk space.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RecomposeError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check the file is valid JSON.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_face_is_surfaced_verbatim() {
        let human = humanize_error(&RecomposeError::NoFaceFound);
        assert_eq!(human.message, "Face not found");
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn empty_mask_is_action_required() {
        let human = humanize_error(&RecomposeError::EmptyMask);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn no_fit_is_permanent() {
        let human = humanize_error(&RecomposeError::NoFitFound { remaining: 5 });
        assert_eq!(human.severity, Severity::Permanent);
        let human = humanize_error(&RecomposeError::HullTooSmall {
            vertices: 4,
            sides: 5,
        });
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn detector_failure_is_the_only_retriable_kind() {
        let human = humanize_error(&RecomposeError::Detector("model not loaded".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
        assert!(human.suggestion.contains("model not loaded"));
    }
}
