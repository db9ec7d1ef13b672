//! EXIF copyright/author stamping.
//!
//! The source profile is read with `kamadak-exif`, merged with the configured
//! fields, serialized back to a TIFF-structured EXIF block and spliced into
//! the encoded output container with `img-parts`.

use exif::experimental::Writer;
use exif::{Field, In, Reader, Tag, Value};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::config::MetadataConfig;
use crate::pipeline::composite::WatermarkedImage;
use crate::types::OutputFormat;

/// Tags that describe the source encoding rather than the picture; they are
/// stale after a resize and re-encode.
const DROPPED_TAGS: &[Tag] = &[
    Tag::PixelXDimension,
    Tag::PixelYDimension,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::RowsPerStrip,
];

/// An editable set of primary-image EXIF fields.
#[derive(Debug, Default)]
pub struct ExifProfile {
    fields: Vec<Field>,
}

impl ExifProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the profile of an image file.
    ///
    /// Returns `None` if the file has no EXIF data or it cannot be parsed.
    pub fn read_from(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader).ok()?;
        Some(Self::from_exif(&exif))
    }

    /// Parse a raw TIFF-structured EXIF block.
    pub fn parse_tiff(bytes: &[u8]) -> Result<Self, exif::Error> {
        let exif = Reader::new().read_raw(bytes.to_vec())?;
        Ok(Self::from_exif(&exif))
    }

    fn from_exif(exif: &exif::Exif) -> Self {
        let fields = exif
            .fields()
            .filter(|f| f.ifd_num == In::PRIMARY)
            .filter(|f| !DROPPED_TAGS.contains(&f.tag))
            .filter(|f| !matches!(f.value, Value::Unknown(..)))
            .map(|f| Field {
                tag: f.tag,
                ifd_num: f.ifd_num,
                value: f.value.clone(),
            })
            .collect();
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.fields.iter().any(|f| f.tag == tag)
    }

    /// First string of an ASCII field.
    pub fn get_ascii(&self, tag: Tag) -> Option<String> {
        self.fields.iter().find(|f| f.tag == tag).and_then(|f| match &f.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
    }

    /// Insert or replace an ASCII field in the primary IFD.
    pub fn set_ascii(&mut self, tag: Tag, value: &str) {
        let field = Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        };
        match self.fields.iter_mut().find(|f| f.tag == tag) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Serialize to a big-endian TIFF-structured EXIF block.
    pub fn to_tiff_bytes(&self) -> Result<Vec<u8>, exif::Error> {
        let mut writer = Writer::new();
        for field in &self.fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false)?;
        Ok(buf.into_inner())
    }

    /// Splice this profile into an encoded image.
    ///
    /// JPEG gets an APP1 segment, PNG an eXIf chunk. GIF has nowhere to put
    /// EXIF, so the input is returned unchanged.
    pub fn embed_into(&self, encoded: Vec<u8>, format: OutputFormat) -> Result<Vec<u8>, String> {
        if self.is_empty() || !format.supports_exif() {
            return Ok(encoded);
        }
        let tiff = Bytes::from(self.to_tiff_bytes().map_err(|e| e.to_string())?);

        let mut out = Vec::with_capacity(encoded.len() + tiff.len() + 16);
        match format {
            OutputFormat::Jpg => {
                let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded)).map_err(|e| e.to_string())?;
                jpeg.set_exif(Some(tiff));
                jpeg.encoder().write_to(&mut out).map_err(|e| e.to_string())?;
            }
            OutputFormat::Png => {
                let mut png = Png::from_bytes(Bytes::from(encoded)).map_err(|e| e.to_string())?;
                png.set_exif(Some(tiff));
                png.encoder().write_to(&mut out).map_err(|e| e.to_string())?;
            }
            OutputFormat::Gif => return Ok(encoded),
        }
        Ok(out)
    }
}

/// Applies the configured copyright and author to a watermarked image.
pub struct MetadataStamper;

impl MetadataStamper {
    /// Clone the image's existing profile (or start a fresh one) and set
    /// Copyright and Artist from the config.
    ///
    /// Empty config strings leave the corresponding field as it was.
    pub fn add_copyright(image: &mut WatermarkedImage, config: &MetadataConfig) {
        let mut profile = image.exif.take().unwrap_or_default();
        Self::stamp(&mut profile, config);
        image.exif = Some(profile);
    }

    /// Set the configured fields on a profile.
    pub fn stamp(profile: &mut ExifProfile, config: &MetadataConfig) {
        if !config.copyright.is_empty() {
            profile.set_ascii(Tag::Copyright, &config.copyright);
        }
        if !config.author_name.is_empty() {
            profile.set_ascii(Tag::Artist, &config.author_name);
        }
    }
}
