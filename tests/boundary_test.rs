use git_monotag::boundary::BoundaryWarning;
use git_monotag::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_changes_display() {
    let warning = BoundaryWarning::NoChangesSinceTag {
        tag: "Api_1.0.0".to_string(),
        current_commit_hash: "abc1234def5678".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No project changes"),
        "Message should contain 'No project changes', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("Api_1.0.0"),
        "Message should contain tag 'Api_1.0.0', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("abc1234") && !display_msg.contains("abc1234d"),
        "Message should contain shortened commit hash 'abc1234', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_short_hash_is_kept() {
    let warning = BoundaryWarning::NoChangesSinceTag {
        tag: "Api_1.0.0".to_string(),
        current_commit_hash: "abc".to_string(),
    };
    assert!(warning.to_string().ends_with("(current: abc)"));
}

#[test]
fn test_boundary_warning_no_tag_display() {
    let warning = BoundaryWarning::NoTag {
        project: "Billing".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'Billing' has no tag"),
        "Message should name the project, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_remote_displays() {
    let no_url = BoundaryWarning::NoWebUrl {
        remote: "origin".to_string(),
    };
    assert_eq!(no_url.to_string(), "Remote 'origin' has no known web URL");

    let not_pushed = BoundaryWarning::TagNotPushed {
        tag: "Api_1.1.0".to_string(),
        remote: "upstream".to_string(),
    };
    let display_msg = not_pushed.to_string();
    assert!(
        display_msg.contains("Api_1.1.0") && display_msg.contains("upstream"),
        "Message should contain tag and remote, got: {}",
        display_msg
    );
}

#[test]
fn test_display_boundary_warning_does_not_panic() {
    ui::display_boundary_warning(&BoundaryWarning::NoTag {
        project: "Api".to_string(),
    });
}

// ============================================================================
// UI Interaction Tests
// ============================================================================

#[cfg(test)]
mod ui_interaction_tests {
    use git_monotag::domain::VersionBump;
    use git_monotag::ui;

    #[test]
    fn test_bump_answers() {
        assert_eq!(ui::parse_bump_answer("major").unwrap(), Some(VersionBump::Major));
        assert_eq!(ui::parse_bump_answer("MI").unwrap(), Some(VersionBump::Minor));
        assert_eq!(ui::parse_bump_answer("no").unwrap(), None);
    }

    #[test]
    fn test_bump_answer_rejects_unknown_input() {
        let result = ui::parse_bump_answer("huge");
        assert!(
            result.is_err(),
            "'huge' should not be accepted, got: {:?}",
            result
        );
    }
}
