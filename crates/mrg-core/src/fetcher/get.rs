//! Single-file HTTP GET, streamed to a temp file and renamed into place.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::FetchError;

/// Downloads `url` to `local_path`. The body streams to a sibling `.part`
/// file which is renamed over `local_path` only after a final HTTP 200, so
/// the destination is either fully written or absent. Returns the byte count.
pub(super) fn download_one(
    url: &str,
    local_path: &Path,
    timeout: Duration,
) -> Result<u64, FetchError> {
    let tmp = part_path(local_path);
    match stream_to_temp(url, &tmp, timeout) {
        Ok(()) => {
            fs::rename(&tmp, local_path)?;
            Ok(fs::metadata(local_path)?.len())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Sibling temp path: `<filename>.part` in the same directory, so the final
/// rename never crosses a filesystem boundary.
fn part_path(local_path: &Path) -> PathBuf {
    let mut name = local_path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn stream_to_temp(url: &str, tmp: &Path, timeout: Duration) -> Result<(), FetchError> {
    let mut out = File::create(tmp)?;
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    // Bound on the whole attempt; on expiry curl aborts and we surface it.
    easy.timeout(timeout)?;

    let perform_err = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform().err()
    };
    if let Some(e) = perform_err {
        return Err(match write_err.take() {
            Some(io_err) => FetchError::Io(io_err),
            None => FetchError::Curl(e),
        });
    }

    let code = easy.response_code()?;
    if code != 200 {
        return Err(FetchError::Http(code));
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_is_sibling_with_suffix() {
        assert_eq!(
            part_path(Path::new("/tmp/7.15.3/routeros.npk")),
            Path::new("/tmp/7.15.3/routeros.npk.part")
        );
    }
}
