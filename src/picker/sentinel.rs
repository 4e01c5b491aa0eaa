/// Watches the invisible marker placed after the last row of the list.
///
/// There is one sentinel per picker. It fires when the marker goes from hidden to fully
/// visible. Detaching the marker (while a page loads, after an error or at the end of
/// data) forgets its visibility, so re-attaching it in view fires again.
#[derive(Debug, Clone, Default)]
pub struct Sentinel {
    attached: bool,
    visible: bool,
}

impl Sentinel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the marker after a render.
    ///
    /// `present` is whether the marker is in the list at all, `visible` whether it fits
    /// entirely in the viewport. Returns `true` when the next page should be requested.
    pub fn observe(&mut self, present: bool, visible: bool) -> bool {
        if !present {
            self.detach();
            return false;
        }

        let fire = visible && !(self.attached && self.visible);
        self.attached = true;
        self.visible = visible;
        fire
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.visible = false;
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
