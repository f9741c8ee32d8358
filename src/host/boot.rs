/// Console start-up services owned by the boot firmware.
///
/// The bridge only forwards to these; what they do to the hardware is up to the
/// implementation.
pub trait Boot {
    fn enable_vblank_interrupt(&mut self);
    fn init_text_console(&mut self);
}

/// Boot services for running off the device. Records what was requested.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeadlessBoot {
    pub vblank_enabled: bool,
    pub console_ready: bool,
}

impl Boot for HeadlessBoot {
    fn enable_vblank_interrupt(&mut self) {
        tracing::info!("vblank interrupt enabled");
        self.vblank_enabled = true;
    }

    fn init_text_console(&mut self) {
        tracing::info!("text console initialised");
        self.console_ready = true;
    }
}
