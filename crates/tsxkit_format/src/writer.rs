//! `.tsx` XML writer
//!
//! Produces the layout Tiled itself writes: one-space indentation, attributes
//! in Tiled's order, optional attributes omitted at their defaults.

use crate::TsxError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;
use tsxkit_core::{Properties, TileAnimation, TileData, Tileset, TilesetImage, WangSet};

type XmlWriter = Writer<Vec<u8>>;

fn tile_ref(tile: Option<u32>) -> String {
    tile.map_or_else(|| "-1".to_string(), |t| t.to_string())
}

pub(crate) fn write_tileset(tileset: &Tileset) -> Result<String, TsxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("tileset");
    root.push_attribute(("version", tileset.version.as_str()));
    if let Some(tiled_version) = &tileset.tiled_version {
        root.push_attribute(("tiledversion", tiled_version.as_str()));
    }
    root.push_attribute(("name", tileset.name.as_str()));
    if !tileset.class.is_empty() {
        root.push_attribute(("class", tileset.class.as_str()));
    }
    root.push_attribute(("tilewidth", tileset.tile_width.to_string().as_str()));
    root.push_attribute(("tileheight", tileset.tile_height.to_string().as_str()));
    if tileset.spacing != 0 {
        root.push_attribute(("spacing", tileset.spacing.to_string().as_str()));
    }
    if tileset.margin != 0 {
        root.push_attribute(("margin", tileset.margin.to_string().as_str()));
    }
    root.push_attribute(("tilecount", tileset.tile_count.to_string().as_str()));
    root.push_attribute(("columns", tileset.columns.to_string().as_str()));
    writer.write_event(Event::Start(root))?;

    let offset = tileset.tile_offset;
    if offset.x != 0 || offset.y != 0 {
        let mut elem = BytesStart::new("tileoffset");
        elem.push_attribute(("x", offset.x.to_string().as_str()));
        elem.push_attribute(("y", offset.y.to_string().as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    write_properties(&mut writer, &tileset.properties)?;

    if let Some(image) = &tileset.image {
        write_image(&mut writer, image)?;
    }

    for (id, data) in &tileset.tiles {
        write_tile(&mut writer, *id, data)?;
    }

    if !tileset.wang_sets.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("wangsets")))?;
        for set in &tileset.wang_sets {
            write_wang_set(&mut writer, set)?;
        }
        writer.write_event(Event::End(BytesEnd::new("wangsets")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("tileset")))?;

    let mut bytes = writer.into_inner();
    bytes.write_all(b"\n")?;
    String::from_utf8(bytes).map_err(|err| TsxError::Utf8(err.utf8_error()))
}

fn write_properties(writer: &mut XmlWriter, properties: &Properties) -> Result<(), TsxError> {
    if properties.is_empty() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("properties")))?;
    for (name, value) in properties {
        let mut elem = BytesStart::new("property");
        elem.push_attribute(("name", name.as_str()));
        if value.type_name() != "string" {
            elem.push_attribute(("type", value.type_name()));
        }
        elem.push_attribute(("value", value.to_tiled_string().as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("properties")))?;
    Ok(())
}

fn write_image(writer: &mut XmlWriter, image: &TilesetImage) -> Result<(), TsxError> {
    let mut elem = BytesStart::new("image");
    elem.push_attribute(("source", image.source.as_str()));
    if let Some(trans) = image.transparent {
        let hex = trans.to_string();
        elem.push_attribute(("trans", hex.trim_start_matches('#')));
    }
    elem.push_attribute(("width", image.width.to_string().as_str()));
    elem.push_attribute(("height", image.height.to_string().as_str()));
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_tile(writer: &mut XmlWriter, id: u32, data: &TileData) -> Result<(), TsxError> {
    let mut elem = BytesStart::new("tile");
    elem.push_attribute(("id", id.to_string().as_str()));
    if !data.class.is_empty() {
        elem.push_attribute(("type", data.class.as_str()));
    }
    if data.probability != 1.0 {
        elem.push_attribute(("probability", data.probability.to_string().as_str()));
    }

    if data.properties.is_empty() && data.image.is_none() && data.animation.is_none() {
        writer.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    writer.write_event(Event::Start(elem))?;
    write_properties(writer, &data.properties)?;
    if let Some(image) = &data.image {
        write_image(writer, image)?;
    }
    if let Some(animation) = &data.animation {
        write_animation(writer, animation)?;
    }
    writer.write_event(Event::End(BytesEnd::new("tile")))?;
    Ok(())
}

fn write_animation(writer: &mut XmlWriter, animation: &TileAnimation) -> Result<(), TsxError> {
    if animation.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("animation")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("animation")))?;
    for frame in &animation.frames {
        let mut elem = BytesStart::new("frame");
        elem.push_attribute(("tileid", frame.tile_id.to_string().as_str()));
        elem.push_attribute(("duration", frame.duration_ms.to_string().as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("animation")))?;
    Ok(())
}

fn write_wang_set(writer: &mut XmlWriter, set: &WangSet) -> Result<(), TsxError> {
    let mut elem = BytesStart::new("wangset");
    elem.push_attribute(("name", set.name.as_str()));
    if !set.class.is_empty() {
        elem.push_attribute(("class", set.class.as_str()));
    }
    elem.push_attribute(("type", set.set_type.as_str()));
    elem.push_attribute(("tile", tile_ref(set.tile).as_str()));
    writer.write_event(Event::Start(elem))?;

    for color in &set.colors {
        let mut elem = BytesStart::new("wangcolor");
        elem.push_attribute(("name", color.name.as_str()));
        if !color.class.is_empty() {
            elem.push_attribute(("class", color.class.as_str()));
        }
        elem.push_attribute(("color", color.color.to_string().as_str()));
        elem.push_attribute(("tile", tile_ref(color.tile).as_str()));
        elem.push_attribute(("probability", color.probability.to_string().as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    for tile in &set.tiles {
        let mut elem = BytesStart::new("wangtile");
        elem.push_attribute(("tileid", tile.tile_id.to_string().as_str()));
        elem.push_attribute(("wangid", tile.wang_id.to_string().as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    writer.write_event(Event::End(BytesEnd::new("wangset")))?;
    Ok(())
}
