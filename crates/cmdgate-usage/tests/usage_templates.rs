//! Integration tests for usage template parsing through the public API.

use cmdgate_usage::{ArgumentSpec, Usage, UsageError};

#[test]
fn test_location_argument_with_permission() {
    let usage = Usage::parse("setspawn <loc{Location:some.perm}>").unwrap();
    let loc = &usage.arguments()[0];
    assert_eq!(loc.key, "loc");
    assert_eq!(loc.type_name, "Location");
    assert_eq!(loc.permission.as_deref(), Some("some.perm"));
    assert!(loc.required);
}

#[test]
fn test_shorthand_key_doubles_as_type() {
    let usage = Usage::parse("msg <player> [message{String}]").unwrap();
    assert_eq!(
        usage.arguments()[0],
        ArgumentSpec {
            key: "player".into(),
            type_name: "player".into(),
            permission: None,
            required: true,
        }
    );
    assert!(!usage.arguments()[1].required);
}

#[test]
fn test_display_round_trips_through_parse() {
    for template in [
        "tp <player> [world]",
        "give <item{ResourceKey}> [amount{Integer:give.many}] -s|--silent --to{player}",
        "spawn",
    ] {
        let usage = Usage::parse(template).unwrap();
        let reparsed = Usage::parse(&usage.to_string()).unwrap();
        assert_eq!(usage, reparsed, "{template}");
    }
}

#[test]
fn test_whitespace_is_collapsed() {
    let usage = Usage::parse("  warp\t <name>   [page{Integer}] ").unwrap();
    assert_eq!(usage.to_string(), "warp <name> [page{Integer}]");
}

#[test]
fn test_flag_lookup_by_name_and_short_form() {
    let usage = Usage::parse("kill <target> -f|--force --reason{String}").unwrap();
    assert_eq!(usage.flag_by_short('f').map(|f| f.key.as_str()), Some("force"));
    assert_eq!(usage.flag_by_name("REASON").map(|f| f.key.as_str()), Some("reason"));
    assert!(usage.flag_by_short('r').is_none());
}

#[test]
fn test_rejections_carry_position() {
    let err = Usage::parse("tp <player> oops").unwrap_err();
    assert_eq!(
        err,
        UsageError::InvalidToken {
            token: "oops".into(),
            position: 2,
        }
    );
}
