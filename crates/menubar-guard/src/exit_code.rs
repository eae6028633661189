//! Process exit codes.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | clean shutdown                            |
//! | 1    | configuration or other startup failure    |
//! | 2    | no primary display                        |
//! | 3    | event tap could not be installed          |
//! | 4    | platform has no event tap support         |

use crate::infrastructure::event_tap::TapError;
use crate::infrastructure::screen_info::ScreenInfoError;

pub const SUCCESS: u8 = 0;
pub const FAILURE: u8 = 1;
pub const NO_DISPLAY: u8 = 2;
pub const TAP_FAILED: u8 = 3;
pub const UNSUPPORTED_PLATFORM: u8 = 4;

/// Maps an error to its exit code by finding the first typed error in its
/// chain.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.downcast_ref::<ScreenInfoError>().is_some() {
            return NO_DISPLAY;
        }
        if let Some(tap) = cause.downcast_ref::<TapError>() {
            return match tap {
                TapError::UnsupportedPlatform(_) => UNSUPPORTED_PLATFORM,
                TapError::CreateFailed | TapError::RunLoopSource | TapError::Invalidated => {
                    TAP_FAILED
                }
            };
        }
    }
    FAILURE
}
