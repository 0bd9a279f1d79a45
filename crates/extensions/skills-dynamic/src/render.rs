//! Argument substitution for skill bodies.
//!
//! Recognised placeholders:
//!
//! - `$ARGUMENTS`: all arguments joined by a single space
//! - `$0`, `$1`, ... `$N`: the argument at that index (any number of digits)
//! - `$$`: a literal `$`
//!
//! The body is scanned once, left to right, and substituted values are
//! never scanned again. `$10` therefore always means index ten, and a `$`
//! inside an argument can never form a placeholder or an escape. Unknown
//! sequences such as `$abc` and indices past the end of `args` are left
//! untouched.

/// Expand placeholders in `body` using `args`.
pub fn substitute_arguments<S: AsRef<str>>(body: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("ARGUMENTS") {
            let joined: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
            out.push_str(&joined.join(" "));
            rest = after;
        } else {
            let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
            let (index, after) = tail.split_at(digits);
            let arg = index
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i));
            match arg {
                Some(arg) => out.push_str(arg.as_ref()),
                None => {
                    out.push('$');
                    out.push_str(index);
                }
            }
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
