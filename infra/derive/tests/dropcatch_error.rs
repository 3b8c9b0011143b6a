#[test]
fn dropcatch_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/dropcatch_error_pass.rs");
}
