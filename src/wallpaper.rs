//! Desktop wallpaper integration.

use std::path::Path;

use anyhow::Result;

/// Set the desktop background to the bitmap at `path`.
#[cfg(windows)]
pub fn set_wallpaper(path: &Path) -> Result<()> {
    use anyhow::anyhow;
    use windows::Win32::UI::WindowsAndMessaging::{
        SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
    };

    let mut wide_path = to_wide_null(path);
    unsafe {
        SystemParametersInfoW(
            SPI_SETDESKWALLPAPER,
            0,
            Some(wide_path.as_mut_ptr().cast()),
            SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
        )
    }
    .map_err(|err| anyhow!("SystemParametersInfoW failed: {err}"))?;
    log::info!("desktop wallpaper set from {}", path.display());
    Ok(())
}

#[cfg(not(windows))]
pub fn set_wallpaper(path: &Path) -> Result<()> {
    anyhow::bail!(
        "setting the desktop wallpaper is only supported on Windows (image saved to {})",
        path.display()
    )
}

#[cfg(windows)]
fn to_wide_null(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}
