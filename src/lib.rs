/// Transforms PetuchPC assembly code to machine code.
///
/// The steps are:
/// 1. **Lexing** - converting each source line into a token
/// 2. **Compiling** - converting tokens into machine code in two passes
///     - Pass 1: Code generation - classifying operands, selecting an encoding and emitting
///       bytes while binding labels to offsets
///     - Pass 2: Relocation - patching label references with the label offsets
pub mod assembler;

/// Instructions, operands and directives of the PetuchPC assembly language
pub mod ast;

/// Hexdump utility
pub mod hexdump;

/// Tracing setup for the binary
pub mod instrumentation;
