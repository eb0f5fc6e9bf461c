use foghorn::*;

#[test]
fn test_status_functions_do_not_panic() {
  info("Test info message");
  warn("Test warning message");
  error("Test error message");
  debug("Test debug message");
  success("Test success message");
}

#[test]
fn test_multiline_messages() {
  let multiline = "First line\nSecond line\nThird line";
  info(multiline);
  warn(multiline);
  error(multiline);
}

#[test]
fn test_empty_message_is_silent() {
  // lines() over "" yields nothing, so nothing should be emitted
  info("");
  error("");
}
