//! Analysis engine loaded from a shared library.
//!
//! The engine exports a small C ABI. Tokenization returns C structs; parse
//! trees and lint results come back as JSON strings in the engine's map
//! encoding. Positions from the engine are code-point indices and are
//! converted to byte offsets here, before anything else sees them.

use libloading::{Library, Symbol};
use serde::Deserialize;
use std::ffi::{CStr, CString, c_char, c_int};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::model::{
    EngineError, FormatOptions, ParseNode, ParseTreeResult, Token, TokenKind, TokenizeResult,
};
use super::{Analyzer, Operation};
use crate::error::{BridgeError, BridgeResult, LockResultExt};

const LOG_TARGET: &str = "exprbridge::gateway";

#[repr(C)]
struct CTokenInfo {
    token_type: c_int,
    text: *mut c_char,
    start: i32,
    end: i32,
    line: i32,
    column: i32,
    is_valid: i32,
}

#[repr(C)]
struct CErrorInfo {
    message: *mut c_char,
    line: i32,
    column: i32,
    start: i32,
    end: i32,
}

#[repr(C)]
struct CTokenizeResult {
    tokens: *mut CTokenInfo,
    token_count: i32,
    errors: *mut CErrorInfo,
    error_count: i32,
}

type TokenizeFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut CTokenizeResult;
type FreeTokenizeFn = unsafe extern "C" fn(*mut CTokenizeResult);
type ValidateFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
type TextFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut c_char;
type TextWithOptionsFn = unsafe extern "C" fn(*const c_char, c_int, *const c_char) -> *mut c_char;
type FreeStringFn = unsafe extern "C" fn(*mut c_char);

const TOKENIZE: &[u8] = b"TokenizeFFI\0";
const FREE_TOKENIZE: &[u8] = b"FreeTokenizeResult\0";
const VALIDATE: &[u8] = b"ValidateFFI\0";
const FORMAT: &[u8] = b"FormatFFI\0";
const FREE_STRING: &[u8] = b"FreeString\0";
const PARSE_TREE: &[u8] = b"ParseTreeFFI\0";
const LINT: &[u8] = b"LintFFI\0";
const FORMAT_WITH_OPTIONS: &[u8] = b"FormatWithOptionsFFI\0";

const REQUIRED_SYMBOLS: [&[u8]; 5] = [TOKENIZE, FREE_TOKENIZE, VALIDATE, FORMAT, FREE_STRING];

/// Deepest parse tree accepted from the engine, counted in nodes from the
/// root. Each node adds two JSON nesting levels (object and `children`).
pub const MAX_TREE_DEPTH: usize = 256;

/// Deepest `{`/`[` nesting in a JSON document, ignoring string contents.
fn json_nesting(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Decode a `ParseTreeFFI` payload. serde_json's default nesting limit
/// would reject ordinary expressions around 63 levels deep, so the limit is
/// lifted and [`MAX_TREE_DEPTH`] is enforced up front instead.
fn decode_parse_tree(json: &str) -> BridgeResult<ParseTreeResult> {
    // The root node sits at depth 2; each level adds an object and an array.
    let nesting = json_nesting(json);
    if nesting > 2 * MAX_TREE_DEPTH + 1 {
        return Err(BridgeError::engine(format!(
            "parse tree nests {} levels, limit is {} nodes",
            nesting, MAX_TREE_DEPTH
        )));
    }
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let result = ParseTreeResult::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(result)
}

fn symbol_name(symbol: &[u8]) -> String {
    String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol)).into_owned()
}

/// Maps engine code-point indices to UTF-8 byte offsets.
struct OffsetMap {
    boundaries: Vec<usize>,
}

impl OffsetMap {
    fn new(text: &str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { boundaries }
    }

    fn to_byte(&self, code_point: i64) -> usize {
        let last = self.boundaries.len() - 1;
        let index = usize::try_from(code_point.max(0)).unwrap_or(0).min(last);
        self.boundaries[index]
    }

    fn remap_node(&self, root: &mut ParseNode) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            node.start = self.to_byte(node.start as i64);
            node.end = self.to_byte(node.end as i64);
            stack.extend(node.children.iter_mut());
        }
    }

    fn remap_error(&self, error: &mut EngineError) {
        if error.start >= 0 {
            error.start = self.to_byte(error.start) as i64;
        }
        if error.end >= 0 {
            error.end = self.to_byte(error.end) as i64;
        }
    }
}

/// Engine handle backed by a dynamically loaded library.
pub struct LibraryAnalyzer {
    library: Library,
    path: PathBuf,
    call_lock: Mutex<()>,
}

impl std::fmt::Debug for LibraryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryAnalyzer")
            .field("path", &self.path)
            .finish()
    }
}

impl LibraryAnalyzer {
    /// Load the engine library and check that the required exports exist.
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref().to_path_buf();
        // SAFETY: loading runs the library's initializers; the engine library
        // is trusted configuration, the same as any plugin.
        let library = unsafe { Library::new(&path)? };

        for symbol in REQUIRED_SYMBOLS {
            let found = unsafe { library.get::<*const ()>(symbol) };
            if found.is_err() {
                return Err(BridgeError::symbol_not_found(symbol_name(symbol)));
            }
        }

        log::info!(target: LOG_TARGET, "Loaded analyzer library from {}", path.display());

        Ok(Self {
            library,
            path,
            call_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn required<T>(&self, symbol: &'static [u8]) -> BridgeResult<Symbol<'_, T>> {
        unsafe { self.library.get::<T>(symbol) }
            .map_err(|_| BridgeError::symbol_not_found(symbol_name(symbol)))
    }

    fn optional<T>(
        &self,
        symbol: &'static [u8],
        operation: Operation,
    ) -> BridgeResult<Symbol<'_, T>> {
        unsafe { self.library.get::<T>(symbol) }.map_err(|_| BridgeError::Unsupported {
            operation: operation.as_str(),
        })
    }

    fn input_len(text: &str) -> BridgeResult<c_int> {
        c_int::try_from(text.len()).map_err(|_| BridgeError::engine("input too large for engine"))
    }

    /// Take ownership of an engine-allocated string and release it.
    fn take_string(&self, ptr: *mut c_char, operation: Operation) -> BridgeResult<String> {
        if ptr.is_null() {
            return Err(BridgeError::NullResult {
                operation: operation.as_str(),
            });
        }
        let free: Symbol<FreeStringFn> = self.required(FREE_STRING)?;
        // SAFETY: the engine returns a NUL-terminated string it allocated and
        // expects back through FreeString.
        let value = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { free(ptr) };
        Ok(value)
    }

    fn call_text(
        &self,
        symbol: Symbol<'_, TextFn>,
        text: &str,
        operation: Operation,
    ) -> BridgeResult<String> {
        let len = Self::input_len(text)?;
        let _guard = self.call_lock.lock().recover_poison(operation.as_str())?;
        let ptr = unsafe { symbol(text.as_ptr().cast(), len) };
        self.take_string(ptr, operation)
    }
}

/// Copy a C string field, treating null as empty.
unsafe fn c_text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

impl Analyzer for LibraryAnalyzer {
    fn tokenize(&self, text: &str) -> BridgeResult<TokenizeResult> {
        let tokenize: Symbol<TokenizeFn> = self.required(TOKENIZE)?;
        let free: Symbol<FreeTokenizeFn> = self.required(FREE_TOKENIZE)?;
        let len = Self::input_len(text)?;
        let offsets = OffsetMap::new(text);

        let _guard = self.call_lock.lock().recover_poison("tokenize")?;
        let raw = unsafe { tokenize(text.as_ptr().cast(), len) };
        if raw.is_null() {
            return Err(BridgeError::NullResult {
                operation: Operation::Tokenize.as_str(),
            });
        }

        // SAFETY: `raw` points to a result the engine owns until
        // FreeTokenizeResult; counts describe the array lengths.
        let result = unsafe {
            let c_result = &*raw;
            let token_count = usize::try_from(c_result.token_count).unwrap_or(0);
            let error_count = usize::try_from(c_result.error_count).unwrap_or(0);

            let tokens = if c_result.tokens.is_null() {
                Vec::new()
            } else {
                std::slice::from_raw_parts(c_result.tokens, token_count)
                    .iter()
                    .map(|token| Token {
                        kind: TokenKind::from_ffi(token.token_type),
                        text: c_text(token.text),
                        start: offsets.to_byte(token.start.into()),
                        end: offsets.to_byte(token.end.into()),
                        line: u32::try_from(token.line).unwrap_or(0),
                        column: u32::try_from(token.column).unwrap_or(0),
                        is_valid: token.is_valid != 0,
                    })
                    .collect()
            };

            let errors = if c_result.errors.is_null() {
                Vec::new()
            } else {
                std::slice::from_raw_parts(c_result.errors, error_count)
                    .iter()
                    .map(|error| {
                        let mut error = EngineError {
                            message: c_text(error.message),
                            line: error.line.into(),
                            column: error.column.into(),
                            start: error.start.into(),
                            end: error.end.into(),
                        };
                        offsets.remap_error(&mut error);
                        error
                    })
                    .collect()
            };

            free(raw);
            TokenizeResult { tokens, errors }
        };

        log::trace!(
            target: LOG_TARGET,
            "tokenize produced {} tokens, {} errors",
            result.tokens.len(),
            result.errors.len()
        );
        Ok(result)
    }

    fn parse_tree(&self, text: &str) -> BridgeResult<ParseTreeResult> {
        let parse: Symbol<TextFn> = self.optional(PARSE_TREE, Operation::ParseTree)?;
        let json = self.call_text(parse, text, Operation::ParseTree)?;
        let mut result = decode_parse_tree(&json)?;

        let offsets = OffsetMap::new(text);
        if let Some(tree) = result.tree.as_mut() {
            offsets.remap_node(tree);
        }
        for error in &mut result.errors {
            offsets.remap_error(error);
        }
        Ok(result)
    }

    fn lint(&self, text: &str) -> BridgeResult<Vec<EngineError>> {
        let lint: Symbol<TextFn> = self.optional(LINT, Operation::Lint)?;
        let json = self.call_text(lint, text, Operation::Lint)?;
        let mut errors: Vec<EngineError> = serde_json::from_str(&json)?;

        let offsets = OffsetMap::new(text);
        for error in &mut errors {
            offsets.remap_error(error);
        }
        Ok(errors)
    }

    fn validate(&self, text: &str) -> BridgeResult<bool> {
        let validate: Symbol<ValidateFn> = self.required(VALIDATE)?;
        let len = Self::input_len(text)?;
        let _guard = self.call_lock.lock().recover_poison("validate")?;
        Ok(unsafe { validate(text.as_ptr().cast(), len) } != 0)
    }

    fn format(&self, text: &str) -> BridgeResult<String> {
        let format: Symbol<TextFn> = self.required(FORMAT)?;
        self.call_text(format, text, Operation::Format)
    }

    fn format_with_options(&self, text: &str, options: &FormatOptions) -> BridgeResult<String> {
        let format: Symbol<TextWithOptionsFn> =
            self.optional(FORMAT_WITH_OPTIONS, Operation::FormatWithOptions)?;
        let options = CString::new(serde_json::to_string(options)?)
            .map_err(|err| BridgeError::engine(err.to_string()))?;
        let len = Self::input_len(text)?;

        let _guard = self.call_lock.lock().recover_poison("formatWithOptions")?;
        let ptr = unsafe { format(text.as_ptr().cast(), len, options.as_ptr()) };
        self.take_string(ptr, Operation::FormatWithOptions)
    }
}
