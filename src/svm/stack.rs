use glam::Vec3;

/// Number of `f32` slots in one evaluation's register file.
pub const SVM_STACK_SIZE: usize = 255;

/// Offset value meaning "no producer / no consumer for this operand".
pub const SVM_STACK_INVALID: u32 = 255;

/// Whether `offset` names a real slot rather than the absent sentinel.
#[inline]
pub fn stack_valid(offset: u32) -> bool {
    offset != SVM_STACK_INVALID
}

/// Flat per-shading-point register file shared by every node of a program.
///
/// Slots that fall past the end (e.g. the tail of a vector read at offset 254)
/// load as zero and ignore stores.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterStack {
    slots: [f32; SVM_STACK_SIZE],
}

impl Default for RegisterStack {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterStack {
    pub fn new() -> Self {
        Self {
            slots: [0.0; SVM_STACK_SIZE],
        }
    }

    /// Zero every slot so the stack can be reused for the next shading point.
    pub fn clear(&mut self) {
        self.slots.fill(0.0);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.slots
    }

    #[inline]
    fn slot(&self, index: usize) -> f32 {
        self.slots.get(index).copied().unwrap_or(0.0)
    }

    #[inline]
    fn set_slot(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = value;
        }
    }

    #[inline]
    pub fn load_float(&self, offset: u32) -> f32 {
        self.slot(offset as usize)
    }

    #[inline]
    pub fn load_float3(&self, offset: u32) -> Vec3 {
        let a = offset as usize;
        Vec3::new(self.slot(a), self.slot(a + 1), self.slot(a + 2))
    }

    /// Stack-overridable operand: the slot value when `offset` is valid,
    /// otherwise the literal embedded in the program.
    #[inline]
    pub fn load_float_default(&self, offset: u32, literal: f32) -> f32 {
        if stack_valid(offset) {
            self.load_float(offset)
        } else {
            literal
        }
    }

    #[inline]
    pub fn store_float(&mut self, offset: u32, value: f32) {
        debug_assert!(stack_valid(offset), "store to absent stack offset");
        self.set_slot(offset as usize, value);
    }

    #[inline]
    pub fn store_float3(&mut self, offset: u32, value: Vec3) {
        debug_assert!(stack_valid(offset), "store to absent stack offset");
        let a = offset as usize;
        self.set_slot(a, value.x);
        self.set_slot(a + 1, value.y);
        self.set_slot(a + 2, value.z);
    }
}

/// Resolve one stack-overridable operand.
#[inline]
pub fn resolve(stack: &RegisterStack, offset: u32, literal: f32) -> f32 {
    stack.load_float_default(offset, literal)
}
