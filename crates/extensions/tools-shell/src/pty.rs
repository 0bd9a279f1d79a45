//! Pseudo-terminal emulation via the platform `script` utility.
//!
//! Some CLIs refuse to run without a TTY. Wrapping them in `script` gives
//! them one while stdout stays a plain pipe for capture.

use agentcore_protocols::error::ExecError;

/// Rewrite `command args...` into an invocation of `script`.
pub(crate) fn wrap(command: &str, args: &[String]) -> Result<(String, Vec<String>), ExecError> {
    if cfg!(target_os = "linux") {
        // util-linux: the command is a single shell string.
        let words = std::iter::once(command).chain(args.iter().map(String::as_str));
        let line = shell_words::join(words);
        Ok((
            "script".to_string(),
            vec!["-qec".to_string(), line, "/dev/null".to_string()],
        ))
    } else if cfg!(target_os = "macos") || cfg!(target_os = "freebsd") {
        // BSD: the command follows the transcript file as argv.
        let mut wrapped = vec!["-q".to_string(), "/dev/null".to_string(), command.to_string()];
        wrapped.extend(args.iter().cloned());
        Ok(("script".to_string(), wrapped))
    } else {
        Err(ExecError::InvalidRequest(
            "PTY mode is not supported on this platform".to_string(),
        ))
    }
}
