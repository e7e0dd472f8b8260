//! Shared fixtures for the integration test suite: well-formed EPCIS
//! XML/JSON documents and small helpers for building variants of them.

#![allow(dead_code)]

pub mod fixtures {
    /// A minimal valid sequence: commissioning ObjectEvent -> packing
    /// AggregationEvent -> shipping ObjectEvent.
    pub fn minimal_valid_sequence_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<epcis:EPCISDocument xmlns:epcis="urn:epcglobal:epcis:xsd:1" schemaVersion="1.2" creationDate="2024-01-15T00:00:00Z">
  <EPCISBody>
    <EventList>
      <ObjectEvent>
        <eventTime>2024-01-15T10:30:47Z</eventTime>
        <eventTimeZoneOffset>+00:00</eventTimeZoneOffset>
        <epcList><epc>urn:epc:id:sgtin:0614141.107346.2017</epc></epcList>
        <action>ADD</action>
        <bizStep>urn:epcglobal:cbv:bizstep:commissioning</bizStep>
        <disposition>urn:epcglobal:cbv:disp:active</disposition>
      </ObjectEvent>
      <AggregationEvent>
        <eventTime>2024-01-15T11:00:47Z</eventTime>
        <eventTimeZoneOffset>+00:00</eventTimeZoneOffset>
        <parentID>urn:epc:id:sscc:0614141.1234567890</parentID>
        <childEPCs><epc>urn:epc:id:sgtin:0614141.107346.2017</epc></childEPCs>
        <action>ADD</action>
        <bizStep>urn:epcglobal:cbv:bizstep:packing</bizStep>
        <disposition>urn:epcglobal:cbv:disp:in_progress</disposition>
      </AggregationEvent>
      <ObjectEvent>
        <eventTime>2024-01-15T11:30:47Z</eventTime>
        <eventTimeZoneOffset>+00:00</eventTimeZoneOffset>
        <epcList><epc>urn:epc:id:sgtin:0614141.107346.2017</epc></epcList>
        <action>OBSERVE</action>
        <bizStep>urn:epcglobal:cbv:bizstep:shipping</bizStep>
        <disposition>urn:epcglobal:cbv:disp:in_transit</disposition>
        <bizTransactionList>
          <bizTransaction type="urn:epcglobal:cbv:btt:po">PO-1</bizTransaction>
          <bizTransaction type="urn:epcglobal:cbv:btt:desadv">DESADV-1</bizTransaction>
        </bizTransactionList>
        <extension>
          <sourceList>
            <source type="urn:epcglobal:cbv:sdt:owning_party">S1</source>
            <source type="urn:epcglobal:cbv:sdt:location">S2</source>
          </sourceList>
          <destinationList>
            <destination type="urn:epcglobal:cbv:sdt:owning_party">D1</destination>
            <destination type="urn:epcglobal:cbv:sdt:location">D2</destination>
          </destinationList>
        </extension>
      </ObjectEvent>
    </EventList>
  </EPCISBody>
</epcis:EPCISDocument>"#
            .to_string()
    }

    /// Shipping over three SGTINs with no preceding commissioning.
    pub fn shipping_without_commissioning_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<epcis:EPCISDocument xmlns:epcis="urn:epcglobal:epcis:xsd:1" schemaVersion="1.2" creationDate="2024-01-15T00:00:00Z">
  <EPCISBody>
    <EventList>
      <ObjectEvent>
        <eventTime>2024-01-15T11:30:47Z</eventTime>
        <eventTimeZoneOffset>+00:00</eventTimeZoneOffset>
        <epcList>
          <epc>urn:epc:id:sgtin:0614141.107346.2017</epc>
          <epc>urn:epc:id:sgtin:0614141.107346.2018</epc>
          <epc>urn:epc:id:sgtin:0614141.107346.2019</epc>
        </epcList>
        <action>OBSERVE</action>
        <bizStep>urn:epcglobal:cbv:bizstep:shipping</bizStep>
        <disposition>urn:epcglobal:cbv:disp:in_transit</disposition>
        <bizTransactionList>
          <bizTransaction type="urn:epcglobal:cbv:btt:po">PO-1</bizTransaction>
          <bizTransaction type="urn:epcglobal:cbv:btt:desadv">DESADV-1</bizTransaction>
        </bizTransactionList>
        <extension>
          <sourceList>
            <source type="urn:epcglobal:cbv:sdt:owning_party">S1</source>
            <source type="urn:epcglobal:cbv:sdt:location">S2</source>
          </sourceList>
          <destinationList>
            <destination type="urn:epcglobal:cbv:sdt:owning_party">D1</destination>
            <destination type="urn:epcglobal:cbv:sdt:location">D2</destination>
          </destinationList>
        </extension>
      </ObjectEvent>
    </EventList>
  </EPCISBody>
</epcis:EPCISDocument>"#
            .to_string()
    }

    /// Event with an invalid `eventTime` and `eventTimeZoneOffset`.
    pub fn invalid_event_time_and_timezone_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<epcis:EPCISDocument xmlns:epcis="urn:epcglobal:epcis:xsd:1" schemaVersion="1.2" creationDate="2024-01-15T00:00:00Z">
  <EPCISBody>
    <EventList>
      <ObjectEvent>
        <eventTime>invalid-time</eventTime>
        <eventTimeZoneOffset>invalid</eventTimeZoneOffset>
        <epcList><epc>urn:epc:id:sgtin:0614141.107346.2017</epc></epcList>
        <action>ADD</action>
        <bizStep>urn:epcglobal:cbv:bizstep:commissioning</bizStep>
        <disposition>urn:epcglobal:cbv:disp:active</disposition>
      </ObjectEvent>
    </EventList>
  </EPCISBody>
</epcis:EPCISDocument>"#
            .to_string()
    }

    /// A minimal JSON-LD document equivalent to a single commissioning
    /// ObjectEvent.
    pub fn commissioning_json() -> String {
        r#"{
  "@context": ["https://ref.gs1.org/standards/epcis/epcis-context.jsonld"],
  "eventList": [{
    "eventType": "ObjectEvent",
    "eventTime": "2024-01-15T10:30:47.000Z",
    "eventTimeZoneOffset": "+00:00",
    "action": "ADD",
    "bizStep": "urn:epcglobal:cbv:bizstep:commissioning",
    "disposition": "urn:epcglobal:cbv:disp:active",
    "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
  }]
}"#
        .to_string()
    }
}
