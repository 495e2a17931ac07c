//! Client-side script that powers the "Copy" buttons on code blocks.
//!
//! Code block buttons carry their code percent-encoded in `data-code` and call
//! [`COPY_FUNCTION_NAME`] with themselves as the argument. A page embeds the
//! script once, wherever it likes.

/// Global function the copy buttons call.
pub const COPY_FUNCTION_NAME: &str = "copyCode";

/// Button attribute holding the percent-encoded code.
pub(crate) const PAYLOAD_ATTRIBUTE: &str = "data-code";

/// Label a button shows after a successful copy.
pub const COPIED_LABEL: &str = "Copied!";

/// How long the copied label stays before reverting.
pub const COPIED_RESET_MS: u32 = 2000;

const SCRIPT: &str = r"(function () {
  function fallbackCopy(text) {
    var field = document.createElement('textarea');
    field.value = text;
    field.setAttribute('readonly', '');
    field.style.position = 'fixed';
    field.style.top = '-9999px';
    field.style.opacity = '0';
    document.body.appendChild(field);
    field.select();
    var ok = false;
    try {
      ok = document.execCommand('copy');
    } catch (e) {
      ok = false;
    }
    document.body.removeChild(field);
    return ok;
  }

  function markCopied(button) {
    var original = button.getAttribute('data-label') || button.textContent;
    button.setAttribute('data-label', original);
    button.textContent = 'Copied!';
    clearTimeout(button._copyTimer);
    button._copyTimer = setTimeout(function () {
      button.textContent = original;
    }, 2000);
  }

  window.copyCode = function (button) {
    var text = decodeURIComponent(button.getAttribute('data-code') || '');
    if (navigator.clipboard && window.isSecureContext) {
      navigator.clipboard.writeText(text).then(
        function () { markCopied(button); },
        function () { if (fallbackCopy(text)) { markCopied(button); } }
      );
      return;
    }
    if (fallbackCopy(text)) {
      markCopied(button);
    }
  };
})();
";

/// The copy script source. Embed once per page.
#[must_use]
pub fn copy_script() -> &'static str {
    SCRIPT
}

/// The copy script wrapped in a `<script>` element.
#[must_use]
pub fn copy_script_tag() -> String {
    format!("<script>\n{SCRIPT}</script>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_defines_global_function() {
        assert!(copy_script().contains(&format!("window.{COPY_FUNCTION_NAME} = function")));
    }

    #[test]
    fn test_script_decodes_payload() {
        assert!(copy_script().contains(&format!(
            "decodeURIComponent(button.getAttribute('{PAYLOAD_ATTRIBUTE}')"
        )));
    }

    #[test]
    fn test_script_has_clipboard_and_fallback() {
        let script = copy_script();
        assert!(script.contains("navigator.clipboard.writeText(text)"));
        assert!(script.contains("document.execCommand('copy')"));
        assert!(script.contains("document.body.removeChild(field)"));
    }

    #[test]
    fn test_script_label_reset() {
        let script = copy_script();
        assert!(script.contains(&format!("'{COPIED_LABEL}'")));
        assert!(script.contains(&format!("}}, {COPIED_RESET_MS});")));
    }

    #[test]
    fn test_script_tag() {
        let tag = copy_script_tag();
        assert!(tag.starts_with("<script>\n"));
        assert!(tag.ends_with("</script>"));
        assert!(tag.contains(copy_script()));
    }

    #[test]
    fn test_script_is_stable() {
        assert_eq!(copy_script(), copy_script());
    }
}
