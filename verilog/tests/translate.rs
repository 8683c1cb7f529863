use datapath_netlist::ComponentId;
use datapath_verilog::{Error, Options, Translation, Warning};

fn id(index: u32) -> ComponentId {
    ComponentId::new(index).unwrap()
}

fn bus(number: u32, entry: u32, exit: u32, bits: u32, x: i64) -> String {
    format!(
        "<bus><number>{number}</number><bits>{bits}</bits><entry>{entry}</entry><exit>{exit}</exit>\
         <xcoordinate>{x}</xcoordinate><xcoordinate2>{x}</xcoordinate2></bus>\n"
    )
}

fn wire(number: u32, entry: u32, bits: u32) -> String {
    format!("<bus><number>{number}</number><bits>{bits}</bits><entry>{entry}</entry></bus>\n")
}

fn device(kind: &str, number: u32, bits: u32, extra: &str) -> String {
    format!("<{kind}><number>{number}</number><bits>{bits}</bits>{extra}</{kind}>\n")
}

fn constant(number: u32, bits: u32, value: &str) -> String {
    device("constant", number, bits, &format!("<name>{value}</name>"))
}

fn drawing(parts: &[String]) -> String {
    format!("<?xml version=\"1.0\"?>\n<processor>\n{}</processor>\n", parts.concat())
}

fn translate(parts: &[String]) -> Translation {
    Translation::new(&drawing(parts)).unwrap()
}

fn always_block(verilog: &str) -> &str {
    let start = verilog.find("always begin\n").unwrap() + "always begin\n".len();
    let end = start + verilog[start..].find("end\n").unwrap();
    &verilog[start..end]
}

fn clocked_block(verilog: &str) -> &str {
    let marker = "always @(posedge Switch[3]) begin\n";
    let start = verilog.find(marker).unwrap() + marker.len();
    let end = start + verilog[start..].find("end\n").unwrap();
    &verilog[start..end]
}

fn binary(kind: &str, bits: u32) -> Vec<String> {
    vec![
        constant(1, 4, "6"),
        constant(2, bits, "2"),
        bus(3, 1, 5, 4, 0),
        bus(4, 2, 5, bits, 7),
        device(kind, 5, 4, ""),
    ]
}

fn unary(kind: &str) -> Vec<String> {
    vec![constant(1, 4, "6"), bus(2, 1, 3, 4, 0), device(kind, 3, 4, "")]
}

#[test]
fn test_pin_to_pin() {
    let translation = translate(&[
        device("input pin", 1, 1, "<name>a</name>"),
        bus(2, 1, 3, 1, 10),
        device("output pin", 3, 1, "<name>y</name>"),
    ]);
    assert_eq!(
        translation.verilog(),
        concat!(
            "// Autogenerated datapath module\n\n",
            "//Switch 0 is connected to input pin a\n",
            "//LED 0 is connected to output pin y\n",
            "module mymodule(input DPSwitch[0:7],Switch[0:5], output LED[0:7]);\n",
            "reg[0:0] table_1; \n",
            "\n",
            "\n\n",
            "always begin\n",
            "table_1=(DPSwitch[0]<<0);\n",
            "end\n",
            "always @(posedge Switch[3]) begin\n",
            "end\n\n",
            "assign LED[0]=(((table_1&1) >>0)&1)==0? 0:1;\n",
            "assign LED[1]=0;\n",
            "assign LED[2]=0;\n",
            "assign LED[3]=0;\n",
            "assign LED[4]=0;\n",
            "assign LED[5]=0;\n",
            "assign LED[6]=0;\n",
            "assign LED[7]=0;\n",
            "endmodule\n",
        )
    );
    assert!(translation.warnings().is_empty());
}

#[test]
fn test_adder() {
    let translation = translate(&[
        constant(1, 4, "5"),
        constant(2, 4, "3"),
        bus(3, 1, 4, 4, 0),
        device("combinational-adder", 4, 4, ""),
        bus(5, 2, 4, 4, 1),
    ]);
    assert_eq!(
        always_block(translation.verilog()),
        "table_1='h5;\ntable_2='h3;\ntable_4='hffffffff&((table_1&15)  + (table_2&15) );\n"
    );
}

#[test]
fn test_gated_register() {
    let translation = translate(&[
        constant(1, 1, "0"),
        constant(2, 4, "7"),
        bus(3, 2, 5, 4, 4),
        device("register", 5, 4, "<enable>6</enable>"),
        wire(6, 1, 1),
    ]);
    let verilog = translation.verilog();
    assert_eq!(always_block(verilog), "table_1='h0;\ntable_2='h7;\nregisterInput_5=(table_2&15) ;\n");
    assert_eq!(clocked_block(verilog), "if((table_1&1) !=0) table_5=registerInput_5;\n");
    assert!(verilog.contains(concat!(
        "\nreg[0:0] table_1; reg[0:3] table_2; reg[0:3] table_5; \n",
        "reg[0:3] registerInput_5; \n\n\n",
    )));
}

#[test]
fn test_register_without_enable() {
    let translation = translate(&[constant(1, 4, "7"), bus(2, 1, 3, 4, 0), device("register", 3, 4, "")]);
    assert_eq!(clocked_block(translation.verilog()), "table_3=registerInput_3;\n");
}

#[test]
fn test_unconnected_bus_reads_zero() {
    let translation = translate(&[
        concat!(
            "<bus><number>1</number><bits>4</bits><exit>2</exit>",
            "<xcoordinate>0</xcoordinate><xcoordinate2>0</xcoordinate2></bus>\n",
        )
        .to_owned(),
        device("register", 2, 4, ""),
    ]);
    assert_eq!(always_block(translation.verilog()), "registerInput_2=0 ;\n");
}

#[test]
fn test_memory() {
    let translation = translate(&[
        constant(1, 2, "2"),
        wire(2, 1, 2),
        constant(3, 8, "5"),
        bus(4, 3, 5, 8, 0),
        device("memory", 5, 8, "<address>2</address>"),
    ]);
    let verilog = translation.verilog();
    assert_eq!(
        always_block(verilog),
        "table_1='h2;\ntable_3='h5;\nregisterInput_5=(table_3&255) ;\ntable_5=memory_5[(table_1&3) ];\n"
    );
    assert_eq!(clocked_block(verilog), "memory_5[(table_1&3) ]=registerInput_5;\n");
    assert!(verilog.contains(concat!(
        "\nreg[0:1] table_1; reg[0:7] table_3; reg[0:7] table_5; \n",
        "reg[0:7] registerInput_5; \n",
        "reg[0:7] memory_5[0:3]; \n\n",
    )));
}

#[test]
fn test_register_file() {
    let translation = translate(&[
        constant(1, 2, "1"),
        wire(2, 1, 2),
        constant(3, 8, "5"),
        bus(4, 3, 5, 8, 0),
        device("register file", 5, 8, "<address>2</address>"),
    ]);
    let verilog = translation.verilog();
    assert_eq!(
        always_block(verilog),
        "table_1='h1;\ntable_3='h5;\nregisterInput_5=(table_3&255) ;\ntable_5=memory_5[(table_1&3) ];\n"
    );
    assert_eq!(clocked_block(verilog), "memory_5[(table_1&3) ]=registerInput_5;\n");
    assert!(verilog.contains("\nreg[0:7] registerInput_5; \nreg[0:7] memory_5[0:3]; \n\n"));
}

#[test]
fn test_lookup_table() {
    let translation = translate(&[
        constant(1, 2, "2"),
        wire(2, 1, 2),
        device(
            "lookup table",
            3,
            8,
            "<address>2</address><value 0>a</value 0><value 2>ff</value 2><value 7>1</value 7>",
        ),
    ]);
    assert_eq!(
        always_block(translation.verilog()),
        "table_1='h2;\ncase((table_1&3) ) \n0: table_3 = 'ha; \n2: table_3 = 'hff; \ndefault: table_3=0; endcase\n"
    );
}

#[test]
fn test_multiplexor() {
    let translation = translate(&[
        constant(1, 1, "1"),
        wire(2, 1, 1),
        constant(3, 4, "a"),
        constant(4, 4, "5"),
        bus(5, 4, 7, 4, 5),
        bus(6, 3, 7, 4, 1),
        device("multiplexor", 7, 4, "<address>2</address>"),
    ]);
    let always = always_block(translation.verilog());
    assert!(always.ends_with(concat!(
        "if ((table_1&1) ==0) table_7=(table_3&15) ;\n",
        "if ((table_1&1) ==1) table_7=(table_4&15) ;\n",
    )));
    assert_eq!(always.matches("table_7=").count(), 2);
}

#[test]
fn test_data_multiplexor() {
    let translation = translate(&[
        constant(1, 2, "2"),
        wire(2, 1, 2),
        constant(3, 4, "a"),
        constant(4, 4, "5"),
        constant(5, 4, "c"),
        bus(6, 5, 9, 4, 9),
        bus(7, 3, 9, 4, 1),
        bus(8, 4, 9, 4, 4),
        device("data_multiplexor", 9, 4, "<address>2</address>"),
    ]);
    assert!(always_block(translation.verilog()).ends_with(concat!(
        "if ((table_1&3) ==0) table_9=(table_3&15) ;\n",
        "if ((table_1&3) ==1) table_9=(table_4&15) ;\n",
        "if ((table_1&3) ==2) table_9=(table_5&15) ;\n",
    )));
}

#[test]
fn test_splitter() {
    let translation = translate(&[
        constant(1, 8, "ab"),
        bus(2, 1, 3, 8, 0),
        device("splitter", 3, 8, "<line 4>7:4</line 4>"),
        wire(4, 3, 4),
        wire(5, 3, 2),
        bus(6, 4, 7, 4, 0),
        device("output pin", 7, 4, "<name>hi</name>"),
    ]);
    let verilog = translation.verilog();
    assert_eq!(
        always_block(verilog),
        "table_4=(table_3>>4)&15;\ntable_5=table_3 & 3;\ntable_1='hab;\ntable_3=(table_1&255) ;\n"
    );
    assert!(verilog.contains("\nreg[0:3] table_4; reg[0:1] table_5; reg[0:7] table_1; reg[0:7] table_3; \n"));
    assert!(verilog.contains("assign LED[3]=(((table_4&15) >>3)&1)==0? 0:1;\n"));
}

#[test]
fn test_joiner() {
    let translation = translate(&[
        constant(1, 4, "1"),
        constant(2, 2, "3"),
        bus(3, 2, 5, 2, 1),
        bus(4, 1, 5, 4, 8),
        device("joiner", 5, 6, ""),
    ]);
    assert!(always_block(translation.verilog()).ends_with("table_5=(((table_1&15) <<0) | ((table_2&3) <<4));\n"));
}

#[test]
fn test_fold() {
    let and = translate(&binary("combinational-and", 4));
    assert!(always_block(and.verilog()).ends_with("table_5=((table_1&15)  & (table_2&15) );\n"));
    let nand = translate(&binary("combinational-nand", 4));
    assert!(always_block(nand.verilog()).ends_with("table_5=~((table_1&15)  & (table_2&15) );\n"));
    let nor = translate(&binary("combinational-nor", 4));
    assert!(always_block(nor.verilog()).ends_with("table_5=~((table_1&15)  | (table_2&15) );\n"));
    let or = translate(&binary("combinational-or", 4));
    assert!(always_block(or.verilog()).ends_with("table_5=((table_1&15)  | (table_2&15) );\n"));
    let xor = translate(&binary("combinational-xor", 4));
    assert!(always_block(xor.verilog()).ends_with("table_5=((table_1&15)  ^ (table_2&15) );\n"));
}

#[test]
fn test_compare() {
    let less = translate(&binary("combinational-less-than", 4));
    assert!(always_block(less.verilog()).ends_with("table_5=(table_1&15)  < (table_2&15) ? 1:0;\n"));
    let equal = translate(&binary("combinational-equal-to", 4));
    assert!(always_block(equal.verilog()).ends_with("table_5=(table_1&15)  == (table_2&15) ? 1:0;\n"));
}

#[test]
fn test_shift() {
    let by_one = translate(&unary("combinational-shift-left"));
    assert!(always_block(by_one.verilog()).ends_with("table_3=(table_1&15)  << 1;\n"));
    let by_amount = translate(&binary("combinational-shift-right", 2));
    assert!(always_block(by_amount.verilog()).ends_with("table_5=(table_1&15)  >> (table_2&3) ;\n"));
}

#[test]
fn test_unary() {
    let cases = [
        ("combinational-not", "table_3=~(table_1&15) ;\n"),
        ("combinational-negate", "table_3=-(table_1&15) ;\n"),
        ("combinational-increment", "table_3=((table_1&15) +1)&'hffffffff;\n"),
        ("combinational-decrement", "table_3=((table_1&15) -1)&'hffffffff;\n"),
    ];
    for (kind, statement) in cases {
        let translation = translate(&unary(kind));
        assert_eq!(always_block(translation.verilog()), format!("table_1='h6;\n{statement}"), "{kind}");
    }
}

#[test]
fn test_input_pins_take_consecutive_lines() {
    let translation = translate(&[
        device("input pin", 1, 2, "<name>a</name>"),
        device("input pin", 2, 3, "<name>b</name>"),
        device("input pin", 3, 0, "<name>c</name>"),
    ]);
    let verilog = translation.verilog();
    assert!(verilog.contains(concat!(
        "//Switch 0 is connected to input pin a\n",
        "//Switch 2 is connected to input pin b\n",
        "//Switch 5 is connected to input pin c\n",
    )));
    assert_eq!(
        always_block(verilog),
        concat!(
            "table_1=(DPSwitch[0]<<0)|(DPSwitch[1]<<1);\n",
            "table_2=(DPSwitch[2]<<0)|(DPSwitch[3]<<1)|(DPSwitch[4]<<2);\n",
            "table_3=0;\n",
        )
    );
}

#[test]
fn test_every_led_assigned_once() {
    let translation = translate(&[
        constant(1, 8, "c3"),
        bus(2, 1, 3, 3, 0),
        device("output pin", 3, 3, "<name>low</name>"),
        bus(4, 1, 5, 2, 0),
        device("output pin", 5, 2, "<name>high</name>"),
    ]);
    let verilog = translation.verilog();
    assert!(verilog.contains("//LED 0 is connected to output pin low\n//LED 3 is connected to output pin high\n"));
    for line in 0..8 {
        assert_eq!(verilog.matches(&format!("assign LED[{line}]=")).count(), 1, "LED {line}");
    }
    assert!(verilog.contains("assign LED[4]=(((table_1&3) >>1)&1)==0? 0:1;\n"));
    assert!(verilog.contains("assign LED[5]=0;\n"));
    assert!(!verilog.contains("table_3;"));
}

#[test]
fn test_too_many_output_lines() {
    let err = Translation::new(&drawing(&[
        constant(1, 8, "1"),
        bus(2, 1, 3, 8, 0),
        device("output pin", 3, 8, ""),
        bus(4, 1, 5, 1, 0),
        device("output pin", 5, 1, ""),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Netlist(datapath_netlist::Error::PinsExhausted { kind: "output", line: 8, available: 8, .. })
    ));
}

#[test]
fn test_unhandled_device() {
    let translation = translate(&[device("blinkenlight", 1, 4, ""), constant(2, 1, "1")]);
    assert_eq!(translation.warnings(), &[Warning::UnhandledDevice { id: id(1), kind: "blinkenlight".to_owned() }]);
    assert!(!translation.verilog().contains("table_1"));
    assert_eq!(always_block(translation.verilog()), "table_2='h1;\n");
}

#[test]
fn test_deterministic() {
    let text = drawing(&binary("combinational-adder", 4));
    assert_eq!(Translation::new(&text).unwrap().verilog(), Translation::new(&text).unwrap().verilog());
}

#[test]
fn test_missing_input() {
    let err = Translation::new(&drawing(&[device("register", 1, 4, "")])).unwrap_err();
    assert!(matches!(err, Error::Netlist(datapath_netlist::Error::MissingInput { index: 0, .. })));

    let err = Translation::new(&drawing(&[device("combinational-adder", 1, 4, "")])).unwrap_err();
    assert!(matches!(err, Error::Netlist(datapath_netlist::Error::MissingInput { index: 0, .. })));
}

#[test]
fn test_multiplexor_without_select_is_skipped() {
    let translation = translate(&[
        constant(1, 4, "1"),
        bus(2, 1, 3, 4, 0),
        device("multiplexor", 3, 4, ""),
        constant(4, 4, "2"),
    ]);
    assert_eq!(translation.warnings(), &[Warning::UnhandledDevice { id: id(3), kind: "multiplexor".to_owned() }]);
    assert_eq!(always_block(translation.verilog()), "table_1='h1;\ntable_4='h2;\n");
    assert!(!translation.verilog().contains("table_3"));
}

#[test]
fn test_missing_address() {
    for kind in ["data_multiplexor", "register file", "memory", "lookup table"] {
        let err = Translation::new(&drawing(&[constant(1, 4, "1"), bus(2, 1, 3, 4, 0), device(kind, 3, 4, "")]))
            .unwrap_err();
        assert!(
            matches!(err, Error::Netlist(datapath_netlist::Error::MissingField { field: "address", .. })),
            "{kind}: {err}"
        );
    }
}

#[test]
fn test_reading_a_driver_without_storage() {
    let drivers = [
        device("output pin", 1, 0, "<name>y</name>"),
        device("blinkenlight", 1, 4, ""),
        device("multiplexor", 1, 4, ""),
    ];
    for first in drivers {
        let err = Translation::new(&drawing(&[first.clone(), bus(2, 1, 3, 4, 0), device("register", 3, 4, "")]))
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::Netlist(datapath_netlist::Error::NoStorage { id, bus, driver })
                    if id.index() == 3 && bus.index() == 2 && driver.index() == 1
            ),
            "{first}: {err}"
        );
    }
}

#[test]
fn test_options() {
    let text = drawing(&[constant(1, 1, "1")]);
    let options = Options::default().with_module_name("cpu").without_header();
    let translation = Translation::with_options(&text, &options).unwrap();
    assert!(translation.verilog().starts_with("module cpu(input DPSwitch[0:7],Switch[0:5], output LED[0:7]);\n"));

    let options = Options::default().with_header("// lab 3");
    let translation = Translation::with_options(&text, &options).unwrap();
    assert!(translation.verilog().starts_with("// lab 3\n\nmodule mymodule("));
}
