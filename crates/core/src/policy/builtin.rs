//! Built-in policy tables for libvips 8.10+.

/// Format load/save operations, implemented by hand against the stream and
/// buffer primitives.
pub const FOREIGN_OPERATIONS: &[&str] = &[
    "csvload", "csvload_source", "csvsave", "csvsave_target",
    "fitsload", "fitsload_source", "fitssave",
    "gifload", "gifload_buffer", "gifload_source", "gifsave", "gifsave_buffer", "gifsave_target",
    "heifload", "heifload_buffer", "heifload_source", "heifsave", "heifsave_buffer", "heifsave_target",
    "jp2kload", "jp2kload_buffer", "jp2kload_source", "jp2ksave", "jp2ksave_buffer", "jp2ksave_target",
    "jpegload", "jpegload_buffer", "jpegload_source", "jpegsave", "jpegsave_buffer", "jpegsave_mime",
    "jpegsave_target",
    "jxlload", "jxlload_buffer", "jxlload_source", "jxlsave", "jxlsave_buffer", "jxlsave_target",
    "magickload", "magickload_buffer", "magicksave", "magicksave_buffer",
    "matload", "matrixload", "matrixload_source", "matrixprint", "matrixsave", "matrixsave_target",
    "niftiload", "niftiload_source", "niftisave",
    "openexrload", "openslideload", "openslideload_source",
    "pdfload", "pdfload_buffer", "pdfload_source",
    "pngload", "pngload_buffer", "pngload_source", "pngsave", "pngsave_buffer", "pngsave_target",
    "ppmload", "ppmload_source", "ppmsave", "ppmsave_target",
    "radload", "radload_buffer", "radload_source", "radsave", "radsave_buffer", "radsave_target",
    "rawload", "rawsave", "rawsave_fd",
    "svgload", "svgload_buffer", "svgload_source",
    "tiffload", "tiffload_buffer", "tiffload_source", "tiffsave", "tiffsave_buffer", "tiffsave_target",
    "vipsload", "vipsload_source", "vipssave", "vipssave_target",
    "webpload", "webpload_buffer", "webpload_source", "webpsave", "webpsave_buffer", "webpsave_target",
];

/// Operations with hand-written wrappers, unsupported argument shapes,
/// reserved names or a newer minimum libvips version.
pub const SPECIAL_EXCLUSIONS: &[&str] = &[
    // fallback chains in the resample wrappers
    "thumbnail", "thumbnail_buffer", "thumbnail_source", "thumbnail_image", "resize",
    // reserved words in Go
    "switch", "case",
    // not image operations
    "system", "profile_load",
    // array image + array enum + offset arrays
    "composite",
    // hand-written colour and arithmetic wrappers
    "icc_transform", "colourspace", "text", "find_trim", "getpoint",
    // value + position + array outputs, or matrix outputs
    "max", "min", "measure",
    // only registered as operations from 8.16
    "sdf", "addalpha",
    // multi-page aware wrappers
    "embed", "crop",
    // in-place drawing with array ink
    "draw_rect", "draw_image", "draw_mask", "draw_flood", "draw_line", "draw_circle", "draw_smudge",
];

/// Operations that are direct children of VipsOperation, or whose reflected
/// family needs regrouping.
pub const CATEGORY_OVERRIDES: &[(&str, &str)] = &[
    ("gaussblur", "convolution"),
    ("sharpen", "convolution"),
    ("canny", "convolution"),
    ("sobel", "convolution"),
    ("prewitt", "convolution"),
    ("scharr", "convolution"),
    ("fastcor", "convolution"),
    ("spcor", "convolution"),
    ("find_trim", "arithmetic"),
    ("getpoint", "arithmetic"),
    ("measure", "arithmetic"),
    ("matrixinvert", "arithmetic"),
    ("matrixmultiply", "arithmetic"),
    ("case", "conversion"),
    ("switch", "conversion"),
    ("colourspace", "colour"),
    ("CMYK2XYZ", "colour"),
    ("XYZ2CMYK", "colour"),
    ("thumbnail_image", "resample"),
    ("thumbnail", "resample"),
    ("thumbnail_buffer", "resample"),
    ("thumbnail_source", "resample"),
    ("globalbalance", "resample"),
    ("match", "resample"),
    ("merge", "resample"),
    ("mosaic", "resample"),
    ("mosaic1", "resample"),
    ("remosaic", "resample"),
    ("hist_equal", "histogram"),
    ("hist_entropy", "histogram"),
    ("hist_ismonotonic", "histogram"),
    ("hist_local", "histogram"),
    ("hist_norm", "histogram"),
    ("hist_plot", "histogram"),
    ("maplut", "histogram"),
    ("percent", "histogram"),
    ("stdif", "histogram"),
    ("system", "create"),
    ("profile_load", "create"),
];

/// Canonical category families. Each accepts its bare name or the `Vips`
/// class name, e.g. `VipsArithmetic`.
pub const CATEGORY_FAMILIES: &[(&str, &str)] = &[
    ("VipsArithmetic", "arithmetic"),
    ("VipsStatistic", "arithmetic"),
    ("VipsConversion", "conversion"),
    ("VipsResample", "resample"),
    ("VipsConvolution", "convolution"),
    ("VipsColour", "colour"),
    ("VipsCreate", "create"),
    ("VipsDraw", "draw"),
    ("VipsMorphology", "morphology"),
    ("VipsForeign", "foreign"),
    ("VipsFreqfilt", "freqfilt"),
    ("VipsHistogram", "histogram"),
];

/// GType enum names and the bridge type that represents them.
pub const ENUM_NAMES: &[(&str, &str)] = &[
    ("VipsKernel", "Kernel"),
    ("VipsSize", "Size"),
    ("VipsDirection", "Direction"),
    ("VipsAngle", "Angle"),
    ("VipsAngle45", "Angle45"),
    ("VipsBandFormat", "BandFormat"),
    ("VipsBlendMode", "BlendMode"),
    ("VipsCoding", "Coding"),
    ("VipsCompassDirection", "Gravity"),
    ("VipsExtend", "ExtendStrategy"),
    ("VipsInteresting", "Interesting"),
    ("VipsInterpretation", "Interpretation"),
    ("VipsIntent", "Intent"),
    ("VipsPrecision", "Precision"),
    ("VipsAlign", "Align"),
    ("VipsTextWrap", "TextWrap"),
    ("VipsCombineMode", "CombineMode"),
    ("VipsCombine", "Combine"),
    ("VipsOperationBoolean", "OperationBoolean"),
    ("VipsOperationMath", "OperationMath"),
    ("VipsOperationMath2", "OperationMath2"),
    ("VipsOperationComplex", "OperationComplex"),
    ("VipsOperationComplex2", "OperationComplex2"),
    ("VipsOperationComplexget", "OperationComplexget"),
    ("VipsOperationRelational", "OperationRelational"),
    ("VipsOperationRound", "OperationRound"),
    ("VipsOperationMorphology", "OperationMorphology"),
    ("VipsForeignDzLayout", "ForeignDzLayout"),
    ("VipsForeignDzDepth", "ForeignDzDepth"),
    ("VipsForeignDzContainer", "ForeignDzContainer"),
    ("VipsForeignTiffCompression", "TiffCompression"),
    ("VipsForeignTiffPredictor", "TiffPredictor"),
    ("VipsForeignPngFilter", "PngFilter"),
    ("VipsForeignSubsample", "SubsampleMode"),
    ("VipsForeignHeifCompression", "HeifCompression"),
    ("VipsRegionShrink", "RegionShrink"),
    ("VipsFalseColour", "FalseColour"),
    ("VipsDemandStyle", "DemandStyle"),
    ("VipsFailOn", "FailOn"),
    ("VipsForeignKeep", "ForeignKeep"),
];

/// Operations registered only from a given libvips (major, minor).
pub const VERSION_GATES: &[(&str, (u32, u32))] = &[
    ("jp2kload", (8, 11)),
    ("jp2kload_buffer", (8, 11)),
    ("jp2kload_source", (8, 11)),
    ("jp2ksave", (8, 11)),
    ("jp2ksave_buffer", (8, 11)),
    ("jp2ksave_target", (8, 11)),
    ("transpose3d", (8, 14)),
    ("sdf", (8, 16)),
    ("addalpha", (8, 16)),
];
