//! Reader and writer implementations of the supported exchange formats,
//! built around the [writer::GeometryWriter] replay interface.

pub mod builder;
pub mod geojson;
mod numeric;
pub mod wkb;
pub mod wkt;
pub mod writer;

#[cfg(test)]
mod test {
    use crate::coord_type::CoordType;
    use crate::geometry::Geometry;
    use crate::io::geojson::GeoJsonWriter;
    use crate::io::wkb::read_wkb;
    use crate::io::wkt::{read_wkt, WktOptions, WktWriter};
    use crate::position::Position;
    use crate::series::PositionSeries;
    use crate::test::{collection_fixture, point_zm_fixture, two_ring_polygon_fixture};

    // decode(encode(x)) == x for every kind and coordinate type, across
    // all three formats
    #[test]
    fn cross_format_round_trips() {
        let mut geometries = vec![
            point_zm_fixture(),
            two_ring_polygon_fixture(),
            collection_fixture(),
            Geometry::MultiPoint(vec![
                Position::xyz(1.0, 2.0, 3.0),
                Position::xyz(4.0, 5.0, 6.0),
            ]),
        ];
        for coord_type in [
            CoordType::XY,
            CoordType::XYZ,
            CoordType::XYM,
            CoordType::XYZM,
        ] {
            let series = PositionSeries::from_coords(
                vec![0.5; 4 * coord_type.dim()],
                coord_type,
            )
            .unwrap();
            geometries.push(Geometry::LineString(series));
        }
        for geometry in geometries {
            let wkt = Geometry::from_wkt(&geometry.to_wkt().unwrap()).unwrap();
            assert_eq!(wkt, geometry);

            let wkb = Geometry::from_wkb(&geometry.to_wkb().unwrap()).unwrap();
            assert_eq!(wkb, geometry);

            if !geometry.coord_type().is_measured() {
                // measures do not survive strict GeoJSON, by design
                let geojson =
                    Geometry::from_geojson(&geometry.to_geojson().unwrap()).unwrap();
                assert_eq!(geojson, geometry);
            }
        }
    }

    // WKB decoded straight into a WKT encoder must reproduce the text the
    // geometry itself encodes to
    #[test]
    fn wkb_to_wkt_transcoding_matches_direct_encoding() {
        for geometry in [
            point_zm_fixture(),
            two_ring_polygon_fixture(),
            collection_fixture(),
        ] {
            let wkb = geometry.to_wkb().unwrap();
            let mut transcoder = WktWriter::new();
            read_wkb(&wkb, &mut transcoder).unwrap();
            assert_eq!(transcoder.finish(), geometry.to_wkt().unwrap());
        }
    }

    #[test]
    fn wkt_to_geojson_transcoding() {
        let mut writer = GeoJsonWriter::new();
        read_wkt("POINT Z(1 2 3)", &mut writer).unwrap();
        assert_eq!(
            writer.finish(),
            r#"{"type":"Point","coordinates":[1,2,3]}"#
        );
    }

    #[test]
    fn wkt_fixture_is_stable_end_to_end() {
        let text = "POINT ZM(2.1 -3.4 34.2 0.2)";
        let geometry = Geometry::from_wkt(text).unwrap();
        assert_eq!(geometry.to_wkt().unwrap(), text);

        // the same value survives a WKB detour
        let via_wkb = Geometry::from_wkb(&geometry.to_wkb().unwrap()).unwrap();
        assert_eq!(via_wkb.to_wkt().unwrap(), text);
    }

    #[test]
    fn polygon_fixture_wkb_to_wkt_zero_decimals() {
        let geometry = two_ring_polygon_fixture();
        let wkb = geometry.to_wkb().unwrap();
        assert!(hex(&wkb).starts_with("010300000002000000050000000000000000804140"));

        let mut writer = WktWriter::with_options(WktOptions {
            decimals: Some(0),
            ..Default::default()
        });
        read_wkb(&wkb, &mut writer).unwrap();
        assert_eq!(
            writer.finish(),
            "POLYGON((35 10,45 45,15 40,10 20,35 10),(20 30,35 35,30 20,20 30))"
        );
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
