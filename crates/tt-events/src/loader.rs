//! Streaming event readers.
//!
//! Both readers yield [`RawEvent`]s lazily; the file is never held in memory.
//! Paths ending in `.gz` are decompressed on the fly.
//!
//! # MATSim XML
//!
//! The simulation's native `output_events.xml(.gz)`: one `<event>` element
//! per event, attributes named as in the CSV header.  Other elements and
//! attributes are skipped.
//!
//! ```xml
//! <events version="1.0">
//!   <event time="25200.0" type="actend" person="p1" link="L1" actType="home"/>
//!   <event time="25200.0" type="PersonEntersVehicle" person="p1" vehicle="p1:car"/>
//!   <event time="25201.0" type="vehicle enters traffic" vehicle="p1:car" link="L1"/>
//! </events>
//! ```
//!
//! # CSV
//!
//! One row per event, in simulation order.  Columns other than `type` may be
//! empty; which ones matter depends on the type.
//!
//! ```csv
//! type,time,person,vehicle,link,actType
//! actend,25200,p1,,L1,home
//! PersonEntersVehicle,25200,p1,p1:car,,
//! vehicle enters traffic,25201,,p1:car,L1,
//! entered link,25260,,p1:car,L2,
//! vehicle leaves traffic,25320,,p1:car,L2,
//! actstart,25320,p1,,L2,work
//! ```

use std::io::{BufRead, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use tt_core::{InputFormat, open_input};

use crate::event::RawEvent;
use crate::EventResult;

/// Boxed event stream returned by [`read_events`].
pub type EventStream = Box<dyn Iterator<Item = EventResult<RawEvent>>>;

/// Open `path` as `format` and return a lazy iterator over its events.
pub fn read_events(path: &Path, format: InputFormat) -> EventResult<EventStream> {
    Ok(match format {
        InputFormat::Csv => Box::new(read_events_csv(path)?),
        InputFormat::Xml => Box::new(read_events_xml(path)?),
    })
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Open a CSV event file and return a lazy iterator over its events.
pub fn read_events_csv(path: &Path) -> EventResult<impl Iterator<Item = EventResult<RawEvent>> + use<>> {
    Ok(read_events_reader(open_input(path)?))
}

/// Like [`read_events_csv`] but accepts any `Read` source.
pub fn read_events_reader<R: Read>(reader: R) -> impl Iterator<Item = EventResult<RawEvent>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader)
        .into_deserialize::<RawEvent>()
        .map(|row| row.map_err(Into::into))
}

// ── XML ───────────────────────────────────────────────────────────────────────

/// Open a MATSim XML event file and return a lazy iterator over its events.
pub fn read_events_xml(path: &Path) -> EventResult<XmlEvents<Box<dyn BufRead>>> {
    Ok(read_events_xml_reader(open_input(path)?))
}

/// Like [`read_events_xml`] but accepts any `BufRead` source.
pub fn read_events_xml_reader<R: BufRead>(reader: R) -> XmlEvents<R> {
    XmlEvents { reader: Reader::from_reader(reader), buf: Vec::new(), done: false }
}

/// Iterator over the `<event>` elements of an XML stream.
///
/// Holds one element's bytes at a time.  A malformed attribute yields an
/// error for that element; a document syntax error is yielded and ends the
/// stream.
pub struct XmlEvents<R: BufRead> {
    reader: Reader<R>,
    buf:    Vec<u8>,
    done:   bool,
}

impl<R: BufRead> Iterator for XmlEvents<R> {
    type Item = EventResult<RawEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(XmlEvent::Empty(e) | XmlEvent::Start(e)) if e.name().as_ref() == b"event" => {
                    return Some(raw_event_from(&e));
                }
                Ok(XmlEvent::Eof) => self.done = true,
                Ok(_) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
        None
    }
}

fn raw_event_from(element: &BytesStart<'_>) -> EventResult<RawEvent> {
    let mut raw = RawEvent::default();
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let slot = match attr.key.as_ref() {
            b"type"    => {
                raw.kind = attr.unescape_value()?.into_owned();
                continue;
            }
            b"time"    => &mut raw.time,
            b"person"  => &mut raw.person,
            b"vehicle" => &mut raw.vehicle,
            b"link"    => &mut raw.link,
            b"actType" => &mut raw.act_type,
            _          => continue,
        };
        *slot = Some(attr.unescape_value()?.into_owned());
    }
    Ok(raw)
}
