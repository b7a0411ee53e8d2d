use motiva::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let validation = Error::Validation("title cannot be empty".to_string());
    assert_eq!(validation.exit_code(), exit_codes::USER_ERROR);

    let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
    assert_eq!(io.exit_code(), exit_codes::OPERATION_FAILED);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::AmbiguousId {
        prefix: "ab".to_string(),
        matches: 3,
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("ambiguous"));

    let details = json.details.expect("details");
    assert_eq!(details["prefix"], "ab");
    assert_eq!(details["matches"], 3);
}

#[test]
fn operation_failures_carry_no_details() {
    let err = Error::OperationFailed("boom".to_string());
    assert!(JsonError::from(&err).details.is_none());
}
