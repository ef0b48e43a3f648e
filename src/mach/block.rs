use super::Address;
use crate::error;
use crate::lang::Error;
use std::collections::BTreeMap;
use tracing::trace;

type Result<T> = std::result::Result<T, Error>;

/// Default ceiling on the number of scopes opened in one compile run.
pub const MAX_BLOCKS: usize = 0xFF_FFFF;

/// Opaque handle of one control scope, in birth order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Point {
    Start,
    Step(u8),
    End,
}

/// A control point inside a scope. Jumps are emitted against labels and
/// patched once every label has an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub block: BlockId,
    pub point: Point,
}

impl Label {
    /// `index << 8 | step`, with 0x00 for the start and 0xFF for the end.
    pub fn packed(self) -> u32 {
        let step = match self.point {
            Point::Start => 0x00,
            Point::Step(n) => n as u32,
            Point::End => 0xFF,
        };
        (self.block.0 << 8) | step
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.point {
            Point::Start => write!(f, "B{}.start", self.block.0),
            Point::Step(n) => write!(f, "B{}.{}", self.block.0, n),
            Point::End => write!(f, "B{}.end", self.block.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    id: BlockId,
    step: u8,
}

/// ## Control block resolver
///
/// Tracks the nesting of `if`, `while` and `choose` scopes and the
/// address reached at each of their control points.

#[derive(Debug)]
pub struct Block {
    max_blocks: usize,
    allocated: usize,
    current: Option<Scope>,
    stack: Vec<Scope>,
    addresses: BTreeMap<Label, Address>,
}

impl Default for Block {
    fn default() -> Self {
        Block::with_limit(MAX_BLOCKS)
    }
}

impl Block {
    pub fn new() -> Block {
        Block::default()
    }

    pub fn with_limit(max_blocks: usize) -> Block {
        Block {
            max_blocks,
            allocated: 0,
            current: None,
            stack: vec![],
            addresses: BTreeMap::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len() + self.current.is_some() as usize
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    pub fn start(&mut self, addr: Address) -> Result<Label> {
        if self.allocated >= self.max_blocks {
            return Err(error!(TooManyBlocks; "LIMIT IS {}", self.max_blocks));
        }
        let id = BlockId(self.allocated as u32);
        self.allocated += 1;
        if let Some(outer) = self.current.take() {
            self.stack.push(outer);
        }
        self.current = Some(Scope { id, step: 0 });
        let label = Label {
            block: id,
            point: Point::Start,
        };
        Ok(self.record(label, addr))
    }

    pub fn link(&mut self, addr: Address) -> Result<Label> {
        let scope = self.scope_mut()?;
        if scope.step == u8::max_value() {
            return Err(error!(TooManyLinks; "B{} HAS 255 STEPS", scope.id.0));
        }
        scope.step += 1;
        let label = Label {
            block: scope.id,
            point: Point::Step(scope.step),
        };
        Ok(self.record(label, addr))
    }

    pub fn end(&mut self, addr: Address) -> Result<Label> {
        let scope = *self.scope()?;
        let label = self.record(
            Label {
                block: scope.id,
                point: Point::End,
            },
            addr,
        );
        self.current = self.stack.pop();
        Ok(label)
    }

    pub fn start_label(&self) -> Result<Label> {
        let scope = self.scope()?;
        Ok(Label {
            block: scope.id,
            point: Point::Start,
        })
    }

    pub fn current_label(&self) -> Result<Label> {
        let scope = self.scope()?;
        Ok(Label {
            block: scope.id,
            point: match scope.step {
                0 => Point::Start,
                n => Point::Step(n),
            },
        })
    }

    /// The label the next `link` will record.
    pub fn next_label(&self) -> Result<Label> {
        let scope = self.scope()?;
        match scope.step.checked_add(1) {
            Some(n) => Ok(Label {
                block: scope.id,
                point: Point::Step(n),
            }),
            None => Err(error!(TooManyLinks; "B{} HAS 255 STEPS", scope.id.0)),
        }
    }

    pub fn end_label(&self) -> Result<Label> {
        let scope = self.scope()?;
        Ok(Label {
            block: scope.id,
            point: Point::End,
        })
    }

    pub fn address(&self, label: Label) -> Option<Address> {
        self.addresses.get(&label).copied()
    }

    pub fn info(&self) -> String {
        match self.current {
            Some(scope) => format!(
                "index {}-{} depth {}",
                scope.id.0,
                scope.step,
                self.depth()
            ),
            None => format!("no open block, {} allocated", self.allocated),
        }
    }

    fn scope(&self) -> Result<&Scope> {
        match &self.current {
            Some(scope) => Ok(scope),
            None => Err(error!(BlockMismatch; "NO OPEN BLOCK")),
        }
    }

    fn scope_mut(&mut self) -> Result<&mut Scope> {
        match &mut self.current {
            Some(scope) => Ok(scope),
            None => Err(error!(BlockMismatch; "NO OPEN BLOCK")),
        }
    }

    fn record(&mut self, label: Label, addr: Address) -> Label {
        trace!(%label, addr, "block label");
        self.addresses.insert(label, addr);
        label
    }
}
