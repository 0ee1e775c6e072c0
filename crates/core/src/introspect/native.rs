//! Live registry access through the native introspection shim.
//!
//! The shim (`native/vipsgen_introspect.c`) is linked against libvips, walks
//! the GType hierarchy below `VipsOperation` and fills fixed-size records:
//!
//! ```c
//! int vipsgen_introspect(IntrospectResult *result);
//! int vipsgen_introspect_enum(const char *type_name, EnumInfo *result);
//! int vipsgen_introspect_enums(const char **enum_names, int n, EnumInfo *results);
//! ```
//!
//! Every call returns zero on success. Strings are copied out of the records
//! before the buffers are released.
//!
//! `NativeReflection` loads the shim as a shared library at runtime. With the
//! `bundled-shim` feature the build script compiles it into this crate and
//! `LinkedReflection` calls it directly.

use std::alloc::{Layout, alloc_zeroed, handle_alloc_error};
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::debug;

use super::Reflection;
use super::raw::{RawArgument, RawEnum, RawEnumValue, RawOperation, TypeTag};
use crate::error::{Error, Result};

pub const MAX_OPS: usize = 1024;
pub const MAX_ARGS: usize = 64;
pub const MAX_ENUM_VALUES: usize = 128;
const NAME_LEN: usize = 256;
const DESCRIPTION_LEN: usize = 1024;

/// Base name of the shim library, without platform prefix or extension
pub const DEFAULT_LIBRARY: &str = "vipsgen_introspect";

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ArgInfo {
    pub name: [c_char; NAME_LEN],
    pub type_tag: c_int,
    pub flags: c_int,
    pub priority: c_int,
    pub defval: f64,
    pub min: f64,
    pub max: f64,
    pub enum_type: [c_char; NAME_LEN],
}

#[repr(C)]
pub struct OpInfo {
    pub name: [c_char; NAME_LEN],
    pub description: [c_char; DESCRIPTION_LEN],
    pub category: [c_char; NAME_LEN],
    pub n_args: c_int,
    pub args: [ArgInfo; MAX_ARGS],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct EnumValueInfo {
    pub c_name: [c_char; NAME_LEN],
    pub nick: [c_char; NAME_LEN],
    pub value: c_int,
}

#[repr(C)]
pub struct EnumInfo {
    pub c_name: [c_char; NAME_LEN],
    pub n_values: c_int,
    pub values: [EnumValueInfo; MAX_ENUM_VALUES],
}

#[repr(C)]
pub struct IntrospectResult {
    pub n_ops: c_int,
    pub ops: [OpInfo; MAX_OPS],
}

/// Plain-old-data records for which all-zero bytes are a valid value.
unsafe trait Zeroable {}

unsafe impl Zeroable for IntrospectResult {}
unsafe impl Zeroable for EnumInfo {}

type IntrospectFn = unsafe extern "C" fn(*mut IntrospectResult) -> c_int;
type IntrospectEnumFn = unsafe extern "C" fn(*const c_char, *mut EnumInfo) -> c_int;
type IntrospectEnumsFn = unsafe extern "C" fn(*const *const c_char, c_int, *mut EnumInfo) -> c_int;

/// The three shim functions, however they were resolved.
#[derive(Clone, Copy)]
struct ShimEntryPoints {
    introspect: IntrospectFn,
    introspect_enum: IntrospectEnumFn,
    introspect_enums: IntrospectEnumsFn,
}

impl ShimEntryPoints {
    fn operations(&self) -> Result<Vec<RawOperation>> {
        let mut result = zeroed_box::<IntrospectResult>();

        let ret = unsafe { (self.introspect)(&mut *result) };
        if ret != 0 {
            return Err(Error::IntrospectionError(format!(
                "vipsgen_introspect returned {ret}; is libvips available and initialised?"
            )));
        }

        let n_ops = clamp_count(result.n_ops, MAX_OPS);
        Ok(result.ops[..n_ops].iter().map(read_operation).collect())
    }

    fn enum_values(&self, type_name: &str) -> Result<RawEnum> {
        let c_name = CString::new(type_name).map_err(|_| {
            Error::EnumIntrospectionError(format!("Invalid enum type name: {type_name}"))
        })?;
        let mut info = zeroed_box::<EnumInfo>();

        let ret = unsafe { (self.introspect_enum)(c_name.as_ptr(), &mut *info) };
        if ret != 0 {
            return Err(Error::EnumIntrospectionError(format!(
                "failed to introspect enum {type_name}"
            )));
        }

        Ok(read_enum(&info))
    }

    fn enum_values_batch(&self, type_names: &[String]) -> Result<Vec<RawEnum>> {
        if type_names.is_empty() {
            return Ok(Vec::new());
        }

        let c_names = type_names
            .iter()
            .map(|name| {
                CString::new(name.as_str()).map_err(|_| {
                    Error::EnumIntrospectionError(format!("Invalid enum type name: {name}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let pointers: Vec<*const c_char> = c_names.iter().map(|name| name.as_ptr()).collect();
        let count = c_int::try_from(type_names.len()).map_err(|_| {
            Error::EnumIntrospectionError(format!("too many enum types: {}", type_names.len()))
        })?;

        let mut results = zeroed_vec::<EnumInfo>(type_names.len());
        let ret = unsafe { (self.introspect_enums)(pointers.as_ptr(), count, results.as_mut_ptr()) };
        if ret != 0 {
            return Err(Error::EnumIntrospectionError(
                "failed to introspect enums".to_string(),
            ));
        }

        Ok(results.iter().map(read_enum).collect())
    }
}

pub struct NativeReflection {
    // Keeps the entry points valid
    _library: Library,
    entry: ShimEntryPoints,
    path: PathBuf,
}

impl NativeReflection {
    /// Load the shim from an explicit path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|e| {
            Error::LibraryError(format!("Failed to load '{}': {e}", path.display()))
        })?;
        debug!("Loaded introspection shim from {:?}", path);

        let entry = ShimEntryPoints {
            introspect: symbol::<IntrospectFn>(&library, path, "vipsgen_introspect")?,
            introspect_enum: symbol::<IntrospectEnumFn>(&library, path, "vipsgen_introspect_enum")?,
            introspect_enums: symbol::<IntrospectEnumsFn>(&library, path, "vipsgen_introspect_enums")?,
        };

        Ok(Self {
            _library: library,
            entry,
            path: path.to_path_buf(),
        })
    }

    /// Load the shim by its platform file name from the loader's search path.
    pub fn open_default() -> Result<Self> {
        Self::open(libloading::library_filename(DEFAULT_LIBRARY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn symbol<F: Copy>(library: &Library, path: &Path, name: &str) -> Result<F> {
    let c_name = CString::new(name)
        .map_err(|_| Error::LibraryError(format!("Invalid symbol name: {name}")))?;
    let symbol: Symbol<'_, F> = unsafe { library.get(c_name.as_bytes_with_nul()) }.map_err(|e| {
        Error::LibraryError(format!(
            "Symbol '{name}' not found in '{}': {e}",
            path.display()
        ))
    })?;
    Ok(*symbol)
}

impl Reflection for NativeReflection {
    fn operations(&self) -> Result<Vec<RawOperation>> {
        self.entry.operations()
    }

    fn enum_values(&self, type_name: &str) -> Result<RawEnum> {
        self.entry.enum_values(type_name)
    }

    fn enum_values_batch(&self, type_names: &[String]) -> Result<Vec<RawEnum>> {
        self.entry.enum_values_batch(type_names)
    }
}

#[cfg(feature = "bundled-shim")]
mod linked {
    use std::os::raw::{c_char, c_int};

    use super::{EnumInfo, IntrospectResult};

    #[link(name = "vipsgen_introspect", kind = "static")]
    unsafe extern "C" {
        pub fn vipsgen_introspect(result: *mut IntrospectResult) -> c_int;
        pub fn vipsgen_introspect_enum(type_name: *const c_char, result: *mut EnumInfo) -> c_int;
        pub fn vipsgen_introspect_enums(
            enum_names: *const *const c_char,
            n: c_int,
            results: *mut EnumInfo,
        ) -> c_int;
    }
}

/// The shim compiled into this crate by the build script.
#[cfg(feature = "bundled-shim")]
#[derive(Clone, Copy)]
pub struct LinkedReflection {
    entry: ShimEntryPoints,
}

#[cfg(feature = "bundled-shim")]
impl LinkedReflection {
    pub fn new() -> Self {
        Self {
            entry: ShimEntryPoints {
                introspect: linked::vipsgen_introspect,
                introspect_enum: linked::vipsgen_introspect_enum,
                introspect_enums: linked::vipsgen_introspect_enums,
            },
        }
    }
}

#[cfg(feature = "bundled-shim")]
impl Default for LinkedReflection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "bundled-shim")]
impl Reflection for LinkedReflection {
    fn operations(&self) -> Result<Vec<RawOperation>> {
        self.entry.operations()
    }

    fn enum_values(&self, type_name: &str) -> Result<RawEnum> {
        self.entry.enum_values(type_name)
    }

    fn enum_values_batch(&self, type_names: &[String]) -> Result<Vec<RawEnum>> {
        self.entry.enum_values_batch(type_names)
    }
}

fn zeroed_box<T: Zeroable>() -> Box<T> {
    let layout = Layout::new::<T>();
    unsafe {
        let ptr = alloc_zeroed(layout).cast::<T>();
        if ptr.is_null() {
            handle_alloc_error(layout);
        }
        Box::from_raw(ptr)
    }
}

fn zeroed_vec<T: Zeroable>(len: usize) -> Vec<T> {
    let mut items = Vec::with_capacity(len);
    unsafe {
        std::ptr::write_bytes(items.as_mut_ptr(), 0, len);
        items.set_len(len);
    }
    items
}

fn clamp_count(count: c_int, max: usize) -> usize {
    usize::try_from(count).unwrap_or(0).min(max)
}

/// Copy a NUL-terminated fixed buffer into an owned string.
fn fixed_str(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn read_operation(info: &OpInfo) -> RawOperation {
    let n_args = clamp_count(info.n_args, MAX_ARGS);
    RawOperation {
        name: fixed_str(&info.name),
        description: fixed_str(&info.description),
        category: fixed_str(&info.category),
        args: info.args[..n_args].iter().map(read_argument).collect(),
    }
}

fn read_argument(info: &ArgInfo) -> RawArgument {
    RawArgument {
        name: fixed_str(&info.name),
        type_tag: TypeTag::Code(info.type_tag),
        flags: info.flags as u32,
        priority: info.priority,
        default: info.defval,
        min: info.min,
        max: info.max,
        enum_type: fixed_str(&info.enum_type),
    }
}

fn read_enum(info: &EnumInfo) -> RawEnum {
    let n_values = clamp_count(info.n_values, MAX_ENUM_VALUES);
    RawEnum {
        name: fixed_str(&info.c_name),
        values: info.values[..n_values]
            .iter()
            .map(|v| RawEnumValue {
                name: fixed_str(&v.c_name),
                nick: fixed_str(&v.nick),
                value: v.value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_record_layouts_match_shim() {
        assert_eq!(size_of::<ArgInfo>(), 552);
        assert_eq!(size_of::<OpInfo>(), 36872);
        assert_eq!(size_of::<EnumValueInfo>(), 516);
    }

    #[test]
    fn test_fixed_str_stops_at_nul() {
        let mut buf = [0 as c_char; 8];
        for (slot, byte) in buf.iter_mut().zip(b"blur") {
            *slot = *byte as c_char;
        }
        assert_eq!(fixed_str(&buf), "blur");

        let full = [b'x' as c_char; 4];
        assert_eq!(fixed_str(&full), "xxxx");
    }

    #[test]
    fn test_read_enum_clamps_count() {
        let mut info = zeroed_box::<EnumInfo>();
        info.n_values = 1000;
        assert_eq!(read_enum(&info).values.len(), MAX_ENUM_VALUES);

        info.n_values = -3;
        assert!(read_enum(&info).values.is_empty());
    }

    #[test]
    fn test_missing_library() {
        let err = NativeReflection::open("/nonexistent/libvipsgen_introspect.so").err().unwrap();
        assert!(matches!(err, Error::LibraryError(_)));
    }

    fn write_str(buf: &mut [c_char], value: &str) {
        for (slot, byte) in buf.iter_mut().zip(value.bytes()) {
            *slot = byte as c_char;
        }
    }

    unsafe extern "C" fn fake_introspect(result: *mut IntrospectResult) -> c_int {
        let result = unsafe { &mut *result };
        result.n_ops = 1;

        let op = &mut result.ops[0];
        write_str(&mut op.name, "gaussblur");
        write_str(&mut op.description, "gaussian blur");
        write_str(&mut op.category, "VipsConvolution");
        op.n_args = 2;

        write_str(&mut op.args[0].name, "sigma");
        op.args[0].type_tag = 2;
        op.args[0].flags = 5;
        op.args[0].priority = 3;
        op.args[0].defval = 1.5;
        op.args[0].max = 1000.0;

        write_str(&mut op.args[1].name, "precision");
        op.args[1].type_tag = 6;
        op.args[1].flags = 1;
        op.args[1].priority = 4;
        write_str(&mut op.args[1].enum_type, "VipsPrecision");
        0
    }

    unsafe extern "C" fn failing_introspect(_result: *mut IntrospectResult) -> c_int {
        -1
    }

    unsafe extern "C" fn fake_enum(type_name: *const c_char, info: *mut EnumInfo) -> c_int {
        let name = unsafe { std::ffi::CStr::from_ptr(type_name) }.to_string_lossy().into_owned();
        if name != "VipsPrecision" {
            return -1;
        }

        let info = unsafe { &mut *info };
        write_str(&mut info.c_name, &name);
        info.n_values = 2;
        write_str(&mut info.values[0].c_name, "VIPS_PRECISION_INTEGER");
        write_str(&mut info.values[0].nick, "integer");
        write_str(&mut info.values[1].c_name, "VIPS_PRECISION_FLOAT");
        write_str(&mut info.values[1].nick, "float");
        info.values[1].value = 1;
        0
    }

    unsafe extern "C" fn fake_enums(names: *const *const c_char, n: c_int, results: *mut EnumInfo) -> c_int {
        for i in 0..usize::try_from(n).unwrap_or(0) {
            if unsafe { fake_enum(*names.add(i), results.add(i)) } != 0 {
                return -1;
            }
        }
        0
    }

    fn fake_entry_points() -> ShimEntryPoints {
        ShimEntryPoints {
            introspect: fake_introspect,
            introspect_enum: fake_enum,
            introspect_enums: fake_enums,
        }
    }

    #[test]
    fn test_operations_read_through_entry_points() {
        let ops = fake_entry_points().operations().unwrap();
        assert_eq!(ops.len(), 1);

        let op = &ops[0];
        assert_eq!(op.name, "gaussblur");
        assert_eq!(op.description, "gaussian blur");
        assert_eq!(op.category, "VipsConvolution");
        assert_eq!(op.args.len(), 2);

        assert_eq!(op.args[0].name, "sigma");
        assert_eq!(op.args[0].type_tag.kind(), crate::types::ArgKind::Double);
        assert_eq!(op.args[0].flags, 5);
        assert_eq!(op.args[0].default, 1.5);
        assert_eq!(op.args[0].max, 1000.0);
        assert!(op.args[0].enum_type.is_empty());

        assert_eq!(op.args[1].type_tag.kind(), crate::types::ArgKind::Enum);
        assert_eq!(op.args[1].enum_type, "VipsPrecision");
    }

    #[test]
    fn test_failed_introspection_is_an_error() {
        let entry = ShimEntryPoints {
            introspect: failing_introspect,
            ..fake_entry_points()
        };
        let err = entry.operations().unwrap_err();
        assert!(matches!(err, Error::IntrospectionError(_)));
    }

    #[test]
    fn test_enum_queries() {
        let entry = fake_entry_points();

        let precision = entry.enum_values("VipsPrecision").unwrap();
        assert_eq!(precision.name, "VipsPrecision");
        assert_eq!(precision.values[1].name, "VIPS_PRECISION_FLOAT");
        assert_eq!(precision.values[1].value, 1);

        let err = entry.enum_values("VipsMissing").unwrap_err();
        assert!(matches!(err, Error::EnumIntrospectionError(_)));

        let batch = entry.enum_values_batch(&["VipsPrecision".to_string()]).unwrap();
        assert_eq!(batch, vec![precision]);

        let err = entry
            .enum_values_batch(&["VipsPrecision".to_string(), "VipsMissing".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::EnumIntrospectionError(_)));
        assert!(entry.enum_values_batch(&[]).unwrap().is_empty());
    }
}
