/** Represents the address of an instruction that jumps to a `Label`. */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Patch(usize);

impl Patch {
    /** The address is expressed as a byte offset into the compiled code. */
    pub fn new(address: usize) -> Self { Patch(address) }

    pub fn address(&self) -> usize { self.0 }
}

//-----------------------------------------------------------------------------

/**
 * Represents a possibly unknown control-flow target, and accumulates the
 * [`Patch`]es of the instructions that jump to it while it is unknown.
 *
 * A `Label` is defined at most once. Defining it resolves and forgets all
 * its `Patch`es; jumps assembled afterwards use the known target directly.
 */
#[derive(Debug, Default)]
pub struct Label {
    target: Option<usize>,
    patches: Vec<Patch>,
}

impl Label {
    /** Constructs an unused `Label` with an unknown target address. */
    pub fn new() -> Self {
        Label {target: None, patches: Vec::new()}
    }

    /** Constructs a `Label` whose target is already known. */
    pub fn at(target: usize) -> Self {
        Label {target: Some(target), patches: Vec::new()}
    }

    /**
     * Returns the target address of this `Label`, if known. The address is
     * expressed as a byte offset into the compiled code.
     */
    pub fn target(&self) -> Option<usize> { self.target }

    /** Tests whether `label` has a known target address. */
    pub fn is_defined(&self) -> bool {
        self.target().is_some()
    }

    /** Tests whether any jumps to `self` are awaiting its target. */
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        !self.patches.is_empty()
    }

    /**
     * Appends `patch` to the list of instructions that jump to `self`.
     * Only meaningful while `self` is undefined.
     */
    pub fn push(&mut self, patch: Patch) {
        assert!(!self.is_defined());
        self.patches.push(patch);
    }

    /**
     * Define `self`, which must not previously have been defined, and
     * return the instructions that jump to it so they can be patched.
     */
    pub fn define(&mut self, target: usize) -> Vec<Patch> {
        assert!(!self.is_defined());
        self.target = Some(target);
        std::mem::take(&mut self.patches)
    }
}

//-----------------------------------------------------------------------------
