use dropcatch_domain::ResultCode;

#[test]
fn wire_codes_match_protocol_table() {
    let table = [
        (ResultCode::Success, 1000, 200),
        (ResultCode::BadMethod, 2001, 405),
        (ResultCode::InvalidInput, 2002, 400),
        (ResultCode::Unauthorized, 2200, 401),
        (ResultCode::ObjectExists, 2302, 400),
        (ResultCode::DropNotFound, 2303, 404),
        (ResultCode::InvalidState, 2304, 400),
        (ResultCode::CommandFailed, 2400, 500),
    ];
    for (code, wire, http) in table {
        assert_eq!(code.code(), wire);
        assert_eq!(code.http_status(), http);
    }
    assert!(ResultCode::Success.is_success());
    assert_eq!(serde_json::to_string(&ResultCode::ObjectExists).unwrap(), "2302");
}
