#[test]
fn test_log_helpers_do_not_panic_without_a_logger() {
    crate::log::info("info");
    crate::log::warn("warn");
    crate::log::error("error");
    crate::log::debug("label", "debug");
    crate::log::trace("label", "trace");
    crate::log::state_summary("shopping", 1, 2, 3, 4, 5, 6);
    crate::log::action("purchase_unit", "template 1");
    crate::log::result(true, "ok");
    crate::log::result(false, "fail");
}
