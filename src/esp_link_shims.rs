//! Runtime symbols that `critical-section` and `embassy-time` expect the
//! binary to provide.
//!
//! The remote inbox is an `embassy_sync::signal::Signal` guarded by a
//! `CriticalSectionRawMutex`; the BLE stack writes it from the Bluedroid
//! task while the control loop drains it, so the critical section must be a
//! real cross-task lock.  On host builds `critical-section/std` supplies it.

#[cfg(target_os = "espidf")]
use core::cell::{Cell, RefCell};
#[cfg(target_os = "espidf")]
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(target_os = "espidf")]
static SECTION_LOCK: Mutex<()> = Mutex::new(());

#[cfg(target_os = "espidf")]
thread_local! {
    static NESTING: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

/// Enter a (re-entrant per task) critical section.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    NESTING.with(|nesting| {
        let depth = nesting.get();
        if depth == 0 {
            // A panic inside a section cannot leave the unit payload inconsistent.
            let guard = SECTION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            HELD.with(|held| *held.borrow_mut() = Some(guard));
        }
        let depth = depth.saturating_add(1);
        nesting.set(depth);
        depth
    })
}

/// Leave a critical section; the lock drops when nesting reaches zero.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    NESTING.with(|nesting| {
        let depth = nesting.get();
        if depth == 0 {
            return;
        }
        nesting.set(depth - 1);
        if depth == 1 {
            HELD.with(|held| *held.borrow_mut() = None);
        }
    })
}

/// Monotonic tick source for `embassy_time::Instant` (1 MHz, since boot).
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    // SAFETY: esp_timer is started by the IDF before app_main.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
}

/// Timer wake-up hook.  The control loop sleeps on the FreeRTOS delay and
/// never awaits an embassy `Timer`, so a late wake from a helper thread is
/// enough here.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }
    // SAFETY: embassy-time hands over a live `&Waker` for the duration of
    // this call; it is cloned before returning.
    let waker = unsafe { (*(waker as *const core::task::Waker)).clone() };
    std::thread::spawn(move || {
        let remaining = at.saturating_sub(_embassy_time_now());
        std::thread::sleep(core::time::Duration::from_micros(remaining));
        waker.wake();
    });
}
