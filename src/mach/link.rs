use super::{Address, Block, Label, Program};
use crate::error;
use crate::lang::Error;
use tracing::trace;

type Result<T> = std::result::Result<T, Error>;

/// ## Jump fixups
///
/// Every jump is written with a placeholder operand. The placeholders
/// are patched in emission order once the whole program is compiled.

#[derive(Debug, Default)]
pub struct Link {
    unlinked: Vec<(Address, Label)>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn len(&self) -> usize {
        self.unlinked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlinked.is_empty()
    }

    /// Records that the number item at `addr` must hold the address of `label`.
    pub fn link_addr_to_label(&mut self, addr: Address, label: Label) {
        self.unlinked.push((addr, label));
    }

    pub fn link(&mut self, program: &mut Program, block: &Block) -> Result<()> {
        for (addr, label) in std::mem::take(&mut self.unlinked) {
            let dest = match block.address(label) {
                Some(dest) => dest,
                None => {
                    return Err(error!(InternalError; "LINK FAILURE {} AT {:#x}", label, addr))
                }
            };
            program.patch_num(addr, dest as i64)?;
            trace!(addr, dest, %label, "fixup");
            program
                .listing_mut()
                .comment(&format!("fixup {:#x} {} -> {:#x}", addr, label, dest));
        }
        Ok(())
    }
}
