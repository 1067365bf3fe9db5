//! Text command input
//!
//! The serial task (or UART interrupt) pushes raw bytes into a
//! [`CommandChannel`]; the input manager drains it once per cycle and turns
//! the bytes into the same kind of events the physical controls produce.
//!
//! The channel is a bounded queue guarded by `critical-section`, so the
//! producer may live in interrupt context.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Returned when the queue has no room for another byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull(pub u8);

/// Bounded byte queue between the serial producer and the control loop.
pub struct CommandChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<u8, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Consumer handle. The control loop should be the only consumer.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    fn push(&self, byte: u8) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(byte).map_err(QueueFull)
        })
    }

    fn pop(&self) -> Option<u8> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Queue one received byte.
    ///
    /// Returns `Err(QueueFull(byte))` if the loop has fallen behind.
    pub fn try_send(&self, byte: u8) -> Result<(), QueueFull> {
        self.channel.push(byte)
    }

    /// Queue every byte of `text`, stopping at the first one that does not fit.
    pub fn send_str(&self, text: &str) -> Result<(), QueueFull> {
        text.bytes().try_for_each(|byte| self.try_send(byte))
    }
}

/// Consumer side of a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Take the oldest pending byte, if any.
    pub fn try_receive(&self) -> Option<u8> {
        self.channel.pop()
    }
}

/// Decoded text command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Digit: jump straight to a menu entry
    SelectIndex(u8),
    /// `+` / `-`: one simulated encoder step
    Step(i8),
    /// `b`, `B` or Enter: simulated select press
    Select,
}

/// Byte to command decoder
///
/// Enter may arrive as `\n`, `\r`, or `\r\n`; the pair counts once.
#[derive(Debug, Clone, Default)]
pub struct CommandDecoder {
    after_cr: bool,
}

impl CommandDecoder {
    pub const fn new() -> Self {
        Self { after_cr: false }
    }

    pub fn decode(&mut self, byte: u8) -> Option<Command> {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');
        match byte {
            b'\n' if after_cr => None,
            b'0'..=b'9' => Some(Command::SelectIndex(byte - b'0')),
            b'+' => Some(Command::Step(1)),
            b'-' => Some(Command::Step(-1)),
            b'b' | b'B' | b'\n' | b'\r' => Some(Command::Select),
            _ => None,
        }
    }
}
