// Every requested command answered OK
pub const SUCCESS: i32 = 0;

// A command failed or was not OK, the link never opened, or arguments were rejected
pub const FAILURE: i32 = 1;

pub fn code(all_ok: bool) -> i32 {
    if all_ok { SUCCESS } else { FAILURE }
}
