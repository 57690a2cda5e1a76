//! `.tsx` XML reader
//!
//! Walks the quick-xml event stream once, building the tileset model as
//! elements close. Elements the model has no place for are skipped whole.

use crate::TsxError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tsxkit_core::{
    Color, Frame, Properties, PropertyValue, TileAnimation, TileData, TileOffset, Tileset,
    TilesetImage, WangColor, WangId, WangPosition, WangSet, WangSetType, WangTile,
    DEFAULT_FORMAT_VERSION,
};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Attributes of one element, keyed by name
struct Attrs {
    element: String,
    values: HashMap<String, String>,
}

impl Attrs {
    fn from_start(e: &BytesStart) -> Result<Self, TsxError> {
        let mut values = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?;
            values.insert(key, value.into_owned());
        }

        Ok(Self {
            element: element_name(e),
            values,
        })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn string(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    fn parse<T>(&self, name: &'static str) -> Result<Option<T>, TsxError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(name)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|err| self.invalid(name, raw, err.to_string()))
            })
            .transpose()
    }

    fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, TsxError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.parse(name)?.unwrap_or(default))
    }

    fn required<T>(&self, name: &'static str) -> Result<T, TsxError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.parse(name)?.ok_or_else(|| TsxError::MissingAttribute {
            element: self.element.clone(),
            attribute: name,
        })
    }

    /// Tile reference where -1 means "no tile"
    fn tile_ref(&self, name: &'static str) -> Result<Option<u32>, TsxError> {
        match self.parse::<i64>(name)? {
            None | Some(-1) => Ok(None),
            Some(id) => u32::try_from(id)
                .map(Some)
                .map_err(|_| self.invalid(name, &id.to_string(), "not a tile id".to_string())),
        }
    }

    fn invalid(&self, attribute: &str, value: &str, reason: String) -> TsxError {
        TsxError::InvalidAttribute {
            element: self.element.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Next child element of the current parent, with whether it has content.
/// Returns None once the parent's end tag is reached.
fn next_child<'a>(
    reader: &mut XmlReader<'a>,
    parent: &str,
) -> Result<Option<(BytesStart<'a>, bool)>, TsxError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Ok(Some((e, true))),
            Event::Empty(e) => return Ok(Some((e, false))),
            Event::End(_) => return Ok(None),
            Event::Eof => return Err(TsxError::UnexpectedEof(parent.to_string())),
            _ => {}
        }
    }
}

/// Consume the remainder of an element whose start tag was already read
fn skip_rest(reader: &mut XmlReader, e: &BytesStart, open: bool) -> Result<(), TsxError> {
    if open {
        reader.read_to_end(e.name())?;
    }
    Ok(())
}

fn skip_unknown(
    reader: &mut XmlReader,
    e: &BytesStart,
    open: bool,
    parent: &str,
) -> Result<(), TsxError> {
    tracing::trace!(element = %element_name(e), parent, "skipping unsupported element");
    skip_rest(reader, e, open)
}

pub(crate) fn read_tileset(xml: &str) -> Result<Tileset, TsxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => return read_tileset_element(&mut reader, &e, true),
            Event::Empty(e) => return read_tileset_element(&mut reader, &e, false),
            Event::Eof => return Err(TsxError::UnexpectedRoot("an empty document".to_string())),
            _ => {}
        }
    }
}

fn read_tileset_element(
    reader: &mut XmlReader,
    e: &BytesStart,
    open: bool,
) -> Result<Tileset, TsxError> {
    if e.name().as_ref() != b"tileset" {
        return Err(TsxError::UnexpectedRoot(format!("<{}>", element_name(e))));
    }

    let attrs = Attrs::from_start(e)?;
    if attrs.get("source").is_some() {
        return Err(TsxError::UnexpectedRoot(
            "a reference to an external tileset".to_string(),
        ));
    }

    let mut tileset = Tileset::new(
        attrs.string("name"),
        attrs.required("tilewidth")?,
        attrs.required("tileheight")?,
        attrs.required("tilecount")?,
        attrs.required("columns")?,
    );
    tileset.class = attrs.string("class");
    tileset.spacing = attrs.parse_or("spacing", 0)?;
    tileset.margin = attrs.parse_or("margin", 0)?;
    tileset.version = attrs
        .get("version")
        .unwrap_or(DEFAULT_FORMAT_VERSION)
        .to_string();
    tileset.tiled_version = attrs.get("tiledversion").map(str::to_string);

    if !open {
        return Ok(tileset);
    }

    while let Some((child, child_open)) = next_child(reader, "tileset")? {
        match child.name().as_ref() {
            b"image" => {
                tileset.image = Some(read_image(&child)?);
                skip_rest(reader, &child, child_open)?;
            }
            b"tileoffset" => {
                tileset.tile_offset = read_tile_offset(&child)?;
                skip_rest(reader, &child, child_open)?;
            }
            b"properties" if child_open => tileset.properties = read_properties(reader)?,
            b"tile" => read_tile(reader, &child, child_open, &mut tileset)?,
            b"wangsets" if child_open => tileset.wang_sets = read_wang_sets(reader)?,
            _ => skip_unknown(reader, &child, child_open, "tileset")?,
        }
    }

    Ok(tileset)
}

fn read_image(e: &BytesStart) -> Result<TilesetImage, TsxError> {
    let attrs = Attrs::from_start(e)?;
    let mut image = TilesetImage::new(
        attrs.string("source"),
        attrs.parse_or("width", 0)?,
        attrs.parse_or("height", 0)?,
    );
    image.transparent = attrs.parse::<Color>("trans")?;
    Ok(image)
}

fn read_tile_offset(e: &BytesStart) -> Result<TileOffset, TsxError> {
    let attrs = Attrs::from_start(e)?;
    Ok(TileOffset {
        x: attrs.parse_or("x", 0)?,
        y: attrs.parse_or("y", 0)?,
    })
}

fn read_properties(reader: &mut XmlReader) -> Result<Properties, TsxError> {
    let mut properties = Properties::new();

    while let Some((child, open)) = next_child(reader, "properties")? {
        if child.name().as_ref() != b"property" {
            skip_unknown(reader, &child, open, "properties")?;
            continue;
        }

        let attrs = Attrs::from_start(&child)?;
        let name: String = attrs.required("name")?;
        let kind = attrs.get("type").unwrap_or("string");

        // Custom class members nest further <properties>; there is no typed slot for them
        if kind == "class" {
            tracing::debug!(property = %name, "skipping class-typed property");
            skip_rest(reader, &child, open)?;
            continue;
        }

        let raw = match attrs.get("value") {
            Some(value) => {
                skip_rest(reader, &child, open)?;
                value.to_string()
            }
            // Multi-line strings are stored as element text, entities still escaped
            None if open => {
                let text = reader.read_text(child.name())?;
                quick_xml::escape::unescape(&text)
                    .map_err(quick_xml::Error::from)?
                    .into_owned()
            }
            None => String::new(),
        };

        let value = PropertyValue::from_tiled(kind, &raw)
            .map_err(|err| attrs.invalid("value", &raw, err.to_string()))?;
        properties.insert(name, value);
    }

    Ok(properties)
}

fn read_tile(
    reader: &mut XmlReader,
    e: &BytesStart,
    open: bool,
    tileset: &mut Tileset,
) -> Result<(), TsxError> {
    let attrs = Attrs::from_start(e)?;
    let id: u32 = attrs.required("id")?;
    if tileset.tiles.contains_key(&id) {
        return Err(TsxError::DuplicateTile(id));
    }

    let mut data = TileData::new();
    // Tiled 1.9 wrote `class`, every other version writes `type`
    data.class = attrs
        .get("class")
        .or_else(|| attrs.get("type"))
        .unwrap_or_default()
        .to_string();
    data.probability = attrs.parse_or("probability", 1.0)?;

    if open {
        while let Some((child, child_open)) = next_child(reader, "tile")? {
            match child.name().as_ref() {
                b"properties" if child_open => data.properties = read_properties(reader)?,
                b"image" => {
                    data.image = Some(read_image(&child)?);
                    skip_rest(reader, &child, child_open)?;
                }
                b"animation" => {
                    data.animation = Some(if child_open {
                        read_animation(reader)?
                    } else {
                        TileAnimation::default()
                    });
                }
                _ => skip_unknown(reader, &child, child_open, "tile")?,
            }
        }
    }

    tileset.tiles.insert(id, data);
    Ok(())
}

fn read_animation(reader: &mut XmlReader) -> Result<TileAnimation, TsxError> {
    let mut animation = TileAnimation::default();

    while let Some((child, open)) = next_child(reader, "animation")? {
        if child.name().as_ref() == b"frame" {
            let attrs = Attrs::from_start(&child)?;
            animation.frames.push(Frame::new(
                attrs.required("tileid")?,
                attrs.required("duration")?,
            ));
            skip_rest(reader, &child, open)?;
        } else {
            skip_unknown(reader, &child, open, "animation")?;
        }
    }

    Ok(animation)
}

fn read_wang_sets(reader: &mut XmlReader) -> Result<Vec<WangSet>, TsxError> {
    let mut sets = Vec::new();

    while let Some((child, open)) = next_child(reader, "wangsets")? {
        if child.name().as_ref() == b"wangset" {
            sets.push(read_wang_set(reader, &child, open)?);
        } else {
            skip_unknown(reader, &child, open, "wangsets")?;
        }
    }

    Ok(sets)
}

fn read_wang_set(reader: &mut XmlReader, e: &BytesStart, open: bool) -> Result<WangSet, TsxError> {
    let attrs = Attrs::from_start(e)?;
    let mut set = WangSet::new(
        attrs.string("name"),
        attrs.parse_or("type", WangSetType::Mixed)?,
    );
    set.class = attrs.string("class");
    set.tile = attrs.tile_ref("tile")?;

    if !open {
        return Ok(set);
    }

    // Files older than Tiled 1.5 split colors into edge and corner lists,
    // each numbered from 1 in its own slots
    let mut edge_colors = Vec::new();
    let mut corner_colors = Vec::new();

    while let Some((child, child_open)) = next_child(reader, "wangset")? {
        match child.name().as_ref() {
            b"wangcolor" => {
                set.colors.push(read_wang_color(&child)?);
                skip_rest(reader, &child, child_open)?;
            }
            b"wangedgecolor" => {
                edge_colors.push(read_wang_color(&child)?);
                skip_rest(reader, &child, child_open)?;
            }
            b"wangcornercolor" => {
                corner_colors.push(read_wang_color(&child)?);
                skip_rest(reader, &child, child_open)?;
            }
            b"wangtile" => {
                let attrs = Attrs::from_start(&child)?;
                set.tiles.push(WangTile {
                    tile_id: attrs.required("tileid")?,
                    wang_id: attrs.required::<WangId>("wangid")?,
                });
                skip_rest(reader, &child, child_open)?;
            }
            _ => skip_unknown(reader, &child, child_open, "wangset")?,
        }
    }

    merge_legacy_colors(&mut set, edge_colors, corner_colors);

    Ok(set)
}

/// Append pre-1.5 edge then corner colors, shifting corner slots past the edge colors
fn merge_legacy_colors(set: &mut WangSet, edges: Vec<WangColor>, corners: Vec<WangColor>) {
    if !edges.is_empty() && !corners.is_empty() {
        let offset = edges.len();
        for tile in &mut set.tiles {
            for position in WangPosition::ALL.into_iter().filter(|p| p.is_corner()) {
                if let Some(color) = tile.wang_id.color_at(position) {
                    tile.wang_id.set(position, Some(color + offset));
                }
            }
        }
    }

    set.colors.extend(edges);
    set.colors.extend(corners);
}

fn read_wang_color(e: &BytesStart) -> Result<WangColor, TsxError> {
    let attrs = Attrs::from_start(e)?;
    let mut color = WangColor::new(
        attrs.string("name"),
        attrs.parse::<Color>("color")?.unwrap_or_default(),
    );
    color.class = attrs.string("class");
    color.tile = attrs.tile_ref("tile")?;
    color.probability = attrs.parse_or("probability", 1.0)?;
    Ok(color)
}
